//! Control handlers.

mod record_control_mark;

pub use record_control_mark::{
    RecordControlMarkCommand, RecordControlMarkError, RecordControlMarkHandler,
    RecordControlMarkResult,
};
