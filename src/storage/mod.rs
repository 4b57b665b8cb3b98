//!  Storage is organized in two layers.
//!   - [key_value::KeyValueStore] is a generic local key-value store. Every key is a JSON file in
//!     the application directory, see [key_value::FileKeyValueStore].
//!   - [record_store::RecordStore] keeps the whole history of feelings as one JSON array under a
//!     single key and answers "what did I log today".

pub mod error;
pub mod key_value;
pub mod record_store;
