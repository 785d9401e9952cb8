use std::env::VarError;
use std::fmt::Write;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Result, anyhow, bail, Context};

pub fn my_read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    std::fs::read_to_string(&path).with_context(
        || anyhow!("opening path for reading: {:?}", path.as_ref()))
}

pub fn now_unixtime() -> i64 {
    let now = SystemTime::now();
    let now_unixtime: u64 = now.duration_since(SystemTime::UNIX_EPOCH)
        .expect("no overflows, we are after epoch").as_secs();
    now_unixtime as i64
}

/// A 12 character (6 entropy bytes) long hex string useful to tag
/// e.g. error messages for identification.
pub fn randomidstring() -> Result<String, getrandom::Error> {
    let mut buf = [0u8; 6];
    getrandom::getrandom(&mut buf)?;
    let mut s = String::new();
    for byte in buf {
        write!(&mut s, "{:02X}", byte).unwrap();
    }
    Ok(s)
}

/// Get an env var as a String; decoding failures are reported as
/// errors.
pub fn getenv(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e {
            VarError::NotPresent => Ok(None),
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

/// Get an env var as a String; decoding failures are reported as
/// errors. If the var is not set and no fallback was given, an error
/// is reported as well.
pub fn getenv_or(name: &str, fallbackvalue: Option<&str>) -> Result<String> {
    match getenv(name)? {
        Some(s) => Ok(s),
        None => match fallbackvalue {
            Some(v) => Ok(v.to_string()),
            None => bail!("{name:?} env var is missing and \
                           no default provided"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_randomidstring() {
        let s = randomidstring().unwrap();
        assert_eq!(s.len(), 12);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
