//! USALI profit-and-loss statement.

pub mod assembler;
pub mod horizon;
pub mod row;

pub use assembler::{assemble_rows, calculate_pl};
pub use horizon::apply_horizon;
pub use row::{find_row, ids, PlCell, PlRow, RowGroup, RowKind};
