//! # procvisor
//!
//! **Procvisor** is a mailbox-driven process runtime for games and other
//! frame-based programs.
//!
//! Each process is an independent unit of logic (init / handle / tick /
//! cleanup) running on its own Tokio task and addressed through a rendezvous
//! mailbox. A process that stops normally can name a **successor**, which is
//! registered before its predecessor leaves, so chains of processes look
//! continuously alive to the **drain barrier** that gates game-state swaps.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  ProcessSpec │   │  ProcessSpec │   │  ProcessSpec │
//!     │  (walker)    │   │  (fade-in)   │   │  (timer)     │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ run()            ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - Registry (process → mailbox, registration order, live count)   │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to LogWriter and user subscribers)     │
//! └──────┬──────────────────┬──────────────────┬───────────────▲──────┘
//!        ▼                  ▼                  ▼               │ drain()
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │ ProcessActor │   │ ProcessActor │   │ ProcessActor │ ┌─┴──────────┐
//!     │  (mailbox    │   │  (mailbox    │   │  (mailbox    │ │   Stage    │
//!     │   loop)      │   │   loop)      │   │   loop)      │ │ GameState  │
//!     └──────┬───────┘   └──────────────┘   └──────────────┘ │ + Views    │
//!            │ tick() == Ok(false)                            └─────▲──────┘
//!            ▼                                                      │
//!     successor() ─► run(next) ─► deregister self            FrameLoop
//!                                                       (tick_all, update, render)
//! ```
//!
//! ### Lifecycle
//! ```text
//! run(spec)
//!   ├─► init()            Err ─► ProcessInitFailed (never registered, no cleanup)
//!   ├─► register          duplicate ─► ProcessRejected
//!   └─► loop {
//!         Quit             ─► stop, no successor
//!         Tick  ─► tick()  ─► Ok(true) continue │ Ok(false) stop, successor eligible │ Err stop
//!         App   ─► handle_message() ─► Ok continue │ Err stop
//!       }
//!       ├─► cleanup()      exactly once
//!       ├─► on_complete()  if attached
//!       ├─► successor()    only after Ok(false) ─► run(next)
//!       └─► deregister
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Processes**     | Define processes as trait objects or closures.                | [`Process`], [`ProcessFn`], [`ProcessSpec`] |
//! | **Messaging**     | Rendezvous delivery, filtered broadcasts.                     | [`Supervisor`], [`Message`]                 |
//! | **Stage**         | Game states and views swapped after the registry drains.      | [`Stage`], [`GameState`], [`View`]          |
//! | **Frame loop**    | Fixed-rate tick / update / render driver.                     | [`FrameLoop`]                               |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, tests).         | [`Subscribe`], [`LogWriter`]                |
//! | **Errors**        | Typed errors for processes and the runtime.                   | [`ProcessError`], [`RuntimeError`]          |
//! | **Configuration** | Centralize runtime settings.                                  | [`Config`]                                  |
//!
//! ## Example
//! ```rust
//! use procvisor::{Config, ProcessError, ProcessFn, ProcessRef, ProcessSpec, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default()).build();
//!
//!     let hello: ProcessRef = ProcessFn::arc("hello", || async {
//!         println!("Hello from a process!");
//!         Ok::<_, ProcessError>(false)
//!     });
//!     sup.run(ProcessSpec::new(hello.clone()).with_on_complete(|| println!("done")));
//!
//!     sup.tick(&hello).await;
//!     sup.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod process;
mod stage;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Config, MailboxError, StopReason, Supervisor, SupervisorBuilder};
pub use error::{ProcessError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use process::{Message, OnComplete, Payload, Process, ProcessFn, ProcessRef, ProcessSpec};
pub use stage::{FrameLoop, GameState, Stage, StateRef, View, ViewRef};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet, Verbosity};
