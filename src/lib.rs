//! # topicbus
//!
//! `topicbus` is a minimalist, in-process publish/subscribe event bus built
//! on tokio. Producers publish typed events onto named topic channels; every
//! registered subscriber receives its own private copy, delivered
//! asynchronously by a single background dispatch worker so that all
//! deliveries across the bus are strictly serialized in queue order.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `bus`: The façade that owns the topic registry and drives publish fan-out.
//! - `dispatcher`: The bounded delivery queue and its single worker.
//! - `event`: The event envelope and the payload duplication capability.
//! - `subscriber`: The capability a consumer implements to receive events.
//! - `service`: Start/terminate lifecycle control for the dispatch worker.
//! - `config`: Loading and merging bus configuration.
//! - `utils`: Shared utilities, such as error types and logging setup.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use topicbus::{Event, EventBus, Subscriber, SubscriberId};
//!
//! #[derive(Clone)]
//! struct OrderPlaced {
//!     order_id: u64,
//! }
//!
//! struct Auditor;
//!
//! #[async_trait]
//! impl Subscriber for Auditor {
//!     fn id(&self) -> SubscriberId {
//!         "auditor".to_string()
//!     }
//!
//!     async fn handle(&self, event: Event) {
//!         if let Some(order) = event.payload_as::<OrderPlaced>() {
//!             println!("order {} placed", order.order_id);
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), topicbus::BusError> {
//!     let bus = EventBus::new();
//!     bus.create_topic("orders")?;
//!     bus.subscribe(Arc::new(Auditor), "orders")?;
//!     bus.publish(Event::new(OrderPlaced { order_id: 42 }), "orders")?;
//!     Ok(())
//! }
//! ```

pub mod bus;
pub mod config;
pub mod dispatcher;
pub mod event;
pub mod service;
pub mod subscriber;
pub mod utils;


pub use bus::EventBus;
pub use bus::topic::Topic;
pub use config::{Settings, load_config};
pub use dispatcher::Dispatcher;
pub use event::{Event, Payload};
pub use subscriber::{Subscriber, SubscriberId};
pub use utils::error::BusError;
