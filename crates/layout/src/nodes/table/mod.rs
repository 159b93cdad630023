pub mod collapse;
pub mod node;
pub mod solver;

pub use node::{TableCellNode, TableNode, TableRowNode};
pub use solver::ColumnSolver;
