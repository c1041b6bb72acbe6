//! Discord Interactions - wire protocol for the webhook endpoint
//!
//! This crate owns everything between the raw interaction JSON and a typed
//! handler call:
//! - **Wire model** (`interaction`) - inbound payloads, tagged by Discord's
//!   numeric `type` discriminant
//! - **Custom-id codec** (`custom_id`) - the `grid/kind/f1;f2;fn[/action]`
//!   grammar that round-trips component state through the platform
//! - **Counter** (`counter`) - the stateful-component example: pure
//!   transitions plus one-step-ahead message rendering
//! - **Responses** (`response`) - typed interaction-response envelopes and
//!   message/modal builders
//! - **Routing** (`routing`) - two-stage classification into a closed set of
//!   command/component/modal handlers
//!
//! # Architecture
//!
//! ```text
//! POST body → Interaction → classify → Route → handler
//!                                        ↓
//!                    custom_id codec ↔ CounterState → InteractionResponse
//! ```
//!
//! State never touches a server-side store: every control on an outbound
//! message carries its successor state inside its own custom_id, so the next
//! activation is self-contained no matter which control fires.

pub mod counter;
pub mod custom_id;
pub mod interaction;
pub mod response;
pub mod routing;
