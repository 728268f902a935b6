//! `tgrab map` – inspect or extend the title mapping store.

use anyhow::{Context, Result};

use tgrab_core::mapper::TitleMapper;

pub fn run_map(raw: &str, canonical: Option<&str>) -> Result<()> {
    let path = TitleMapper::default_path().context("resolve mapping store path")?;
    let mut mapper = TitleMapper::open(path);

    match canonical {
        Some(canonical) => {
            mapper.add(raw, canonical)?;
            println!("saved: '{}' -> '{}'", raw.trim(), canonical.trim());
        }
        None => match mapper.get(raw) {
            Some(found) => println!("{found}"),
            None => println!("no mapping for '{}'", raw.trim()),
        },
    }
    Ok(())
}
