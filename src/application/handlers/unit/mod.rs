//! Unit handlers - registration, lifecycle transitions and updates.

mod advance_state;
mod create_unit;
mod update_unit;

pub use advance_state::{
    AdvanceStateCommand, AdvanceStateError, AdvanceStateHandler, AdvanceStateResult,
};
pub use create_unit::{CreateUnitCommand, CreateUnitError, CreateUnitHandler, CreateUnitResult};
pub use update_unit::{
    UnitChange, UpdateUnitCommand, UpdateUnitError, UpdateUnitHandler, UpdateUnitResult,
};
