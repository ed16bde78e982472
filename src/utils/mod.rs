use itertools::Itertools;

/// Splits a comma-separated list, trimming entries and dropping empties and
/// repeats while keeping first-seen order.
pub fn parse_csv_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unique()
        .map(str::to_string)
        .collect()
}

pub fn flatten_csv_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| parse_csv_list(v))
        .unique()
        .collect()
}

pub fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let n: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("expected a positive integer, got '{}'", value.trim()))?;
    if n == 0 {
        return Err("expected a positive integer, got 0".to_string());
    }
    Ok(n)
}

pub fn split_command(line: &str) -> (String, &str) {
    let trimmed = line.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(idx) => (
            trimmed[..idx].to_lowercase(),
            trimmed[idx..].trim_start().trim_end_matches(&['\r', '\n'][..]),
        ),
        None => (trimmed.trim_end().to_lowercase(), ""),
    }
}
