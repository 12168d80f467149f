// Core modules implementing the record codec and error modeling.
pub mod error;
pub mod record;
