//! Field catalog for campusql
//!
//! Static knowledge of the two dataset kinds: which fields a record carries,
//! which of them are numeric (mkey) and which are strings (skey), and how a
//! qualified key `<datasetId>_<field>` addresses a record attribute.
//!
//! The planner and the executor both consult this module, so a query that
//! passes validation is always evaluable.

mod fields;
mod key;
mod kind;
mod record;

pub use fields::{classify, FieldClass};
pub use key::{QualifiedKey, KEY_SEPARATOR};
pub use kind::{DatasetKind, ParseKindError};
pub use record::{FieldValue, Record, RecordError};
