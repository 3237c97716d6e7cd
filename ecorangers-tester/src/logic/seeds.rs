use anyhow::{Result, bail};
use ecorangers_game::seed::entropy_seed;

/// Resolve CLI seed tokens into numeric seeds.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex
/// literals, and the keyword `random` for a fresh entropy seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("random") {
            seeds.push(entropy_seed());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
            continue;
        }

        if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            && let Ok(value) = u64::from_str_radix(hex, 16)
        {
            seeds.push(value);
            continue;
        }

        bail!("unrecognised seed '{token}'");
    }

    if seeds.is_empty() {
        bail!("no seeds given");
    }
    seeds.dedup();
    Ok(seeds)
}
