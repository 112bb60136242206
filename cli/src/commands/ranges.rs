use lanmap_core::ranges::resolve_ranges;
use lanmap_core::system::OsSystem;

use crate::commands::parse_range;
use crate::terminal::{format, print};

pub fn ranges(range: Option<&str>) -> anyhow::Result<()> {
    let explicit = parse_range(range)?;
    let resolved = resolve_ranges(explicit, &OsSystem);

    for (idx, range) in resolved.iter().enumerate() {
        print::tree_head(idx, &range.to_string());
        print::as_tree_one_level(vec![
            ("Range".to_string(), format::range_to_value(range)),
            ("Hosts".to_string(), range.hosts().count().to_string().into()),
        ]);
    }
    Ok(())
}
