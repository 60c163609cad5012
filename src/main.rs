mod entry;
mod logger;

use vuload::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
