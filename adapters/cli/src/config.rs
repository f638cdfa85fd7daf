//! Loading of gameplay tuning overrides from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use arena_core::Tuning;

/// Reads the tuning table at `path`, or the shipped defaults when no path is given.
///
/// Tables only need to name the knobs they override; everything else keeps
/// its default value.
pub(crate) fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    let tuning = parse_tuning(&text)
        .with_context(|| format!("invalid tuning file {}", path.display()))?;
    Ok(tuning)
}

fn parse_tuning(text: &str) -> Result<Tuning> {
    let tuning: Tuning = toml::from_str(text).context("malformed TOML")?;
    tuning.validate()?;
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_yields_defaults() {
        assert_eq!(load_tuning(None).expect("defaults"), Tuning::default());
    }

    #[test]
    fn partial_tables_override_only_named_knobs() {
        let tuning = parse_tuning(
            "[weapon]\ndamage = 45\n\n[respawn]\ndelay_ms = 500\n",
        )
        .expect("valid tuning");

        assert_eq!(tuning.weapon.damage, 45);
        assert_eq!(tuning.weapon.fire_interval_ms, 350);
        assert_eq!(tuning.respawn.delay_ms, 500);
        assert_eq!(tuning.respawn.invulnerability_ticks, 90);
        assert_eq!(tuning.entity, Tuning::default().entity);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let error = parse_tuning("[drivers]\nhuman_ability_chance = 1.5\n")
            .expect_err("probability above one");
        assert!(format!("{error:#}").contains("drivers.human_ability_chance"));
    }

    #[test]
    fn files_are_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[entity]\nspeed = 6.0").expect("write tuning");

        let tuning = load_tuning(Some(file.path())).expect("tuning loads");
        assert_eq!(tuning.entity.speed, 6.0);
    }

    #[test]
    fn unreadable_files_name_the_path() {
        let error = load_tuning(Some(Path::new("/nonexistent/arena.toml")))
            .expect_err("missing file");
        assert!(error.to_string().contains("/nonexistent/arena.toml"));
    }
}
