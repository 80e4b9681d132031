//! # image-dedup CLI
//!
//! Command-line interface for the fingerprint duplicate finder.
//!
//! ## Usage
//! ```bash
//! image-dedup scan ~/Pictures/inbox
//! image-dedup scan ~/Pictures/inbox --algorithms exact,perceptual --output json
//! image-dedup review ~/Pictures/inbox
//! ```

mod cli;

use fingerprint_dedup::Result;

fn main() -> Result<()> {
    cli::run()
}
