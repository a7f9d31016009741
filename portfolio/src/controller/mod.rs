//! View-state controller.
//!
//! The UI emits `Intent`s, renders `UiState` and listens for one-shot
//! `Notification`s. All state changes go through `reducer::reduce`; the
//! `CryptoController` only performs the effects (repository and favorites
//! calls) and feeds their outcomes back in as `Action`s.

pub mod crypto_controller;
pub mod intent;
pub mod notifier;
pub mod reducer;
pub mod state;

pub use crypto_controller::CryptoController;
pub use intent::{Intent, Notification};
pub use notifier::Notifier;
pub use reducer::{Action, FetchKind, Transition, reduce};
pub use state::{UiState, filter_assets};
