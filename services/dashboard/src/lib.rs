mod cli;
mod infra;
mod render;

use vendor_kpi::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
