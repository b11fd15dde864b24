mod batch;
mod output;
mod run;

pub use run::run;

use batch::*;
use output::*;
