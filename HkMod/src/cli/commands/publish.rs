//! CLI command for publishing to a ModLinks file

use std::time::Instant;

use crate::cli::progress::{DISK, TRUCK, print_done, print_step};
use crate::operations::{PublishOptions, publish};
use crate::transport::HttpTransport;

pub fn execute(opts: &PublishOptions) -> anyhow::Result<()> {
    let start = Instant::now();
    let transport = HttpTransport::new()?;

    print_step(1, 2, TRUCK, &format!("Hashing {}", opts.url));
    let outcome = publish(opts, &transport)?;

    let action = if outcome.added { "Added" } else { "Updated" };
    print_step(
        2,
        2,
        DISK,
        &format!(
            "{action} {} {} in {}",
            outcome.name,
            outcome.version,
            opts.modlinks_path.display()
        ),
    );
    print_done(start.elapsed());
    Ok(())
}
