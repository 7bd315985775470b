/// Lines in BED-like files starting with one of these are treated as header lines.
pub const HEADER_PREFIXES: [&str; 3] = ["#", "track", "browser"];

/// Number of tab-separated columns in a fragments file record.
pub const FRAGMENT_COLUMNS: usize = 5;
