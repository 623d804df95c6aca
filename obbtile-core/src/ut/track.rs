// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use colored::*;
use kdam::{Bar, tqdm};

/// A basic progress bar for tracking iterations
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    tqdm!(
        total = n,
        force_refresh = false,
        desc = progress_timestamp(desc),
        bar_format =
            "{desc suffix=' '}[{percentage:.0}%] ({rate:.1}/s, eta: {remaining human=true})"
    )
}

/// A progress description with a standardized timestamp
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now();
    let ymd = time.format("%Y-%m-%d").to_string();
    let hms = time.format("%H:%M:%S").to_string();
    let time = format!("{} | {}", ymd, hms);

    format!(
        "{} {} {} {} {} {}",
        "[".bold(),
        time,
        "|".bold(),
        "obbtile".truecolor(70, 130, 180).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Format numbers to readable thousands format
///
/// # Examples
///
/// ```
/// use obbtile_core::ut::track::thousands_format;
///
/// assert_eq!(thousands_format(1234), "1234");
/// assert_eq!(thousands_format(1234567), "1,234,567");
/// ```
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();
    if number.len() > 4 {
        number
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<String>>()
            .join(",")
    } else {
        number
    }
}
