//! One module per subcommand.

pub mod completions;
pub mod erase;
pub mod evaluate;
pub mod reconcile;
pub mod simulate;
pub mod viz;
