//! Write HTTP access lines in the Combined Log Format (extended
//! Common Log Format, Apache style), as per
//! <https://httpd.apache.org/docs/2.4/logs.html>, to stderr.

use std::io::{stderr, BufWriter, Write};
use std::mem::swap;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use chrono::{DateTime, Datelike, Timelike, Utc};
use rouille::{Response, ResponseBody};

use crate::pcontext::PContext;
use crate::warn;

const MONTHS: &[&str; 12] =
    &["Jan", "Feb", "Mar", "Apr", "May", "Jun",
      "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

// "06/Dec/2023:02:02:47 +0000"
pub fn write_time(
    outp: &mut impl Write,
    time: SystemTime
) -> Result<()> {
    let dt: DateTime<Utc> = DateTime::from(time);
    write!(outp, "{:02}/{}/{:04}:{:02}:{:02}:{:02} +0000",
           dt.day(), MONTHS[dt.month0() as usize], dt.year(),
           dt.hour(), dt.minute(), dt.second())?;
    Ok(())
}

// The body length fields are private and there are no accessors, so
// temporarily swap the body out and back.
fn response_body_len(response: &mut Response) -> Option<usize> {
    let mut responsebody = ResponseBody::empty();
    swap(&mut responsebody, &mut response.data);
    let (data, length) = responsebody.into_reader_and_size();
    responsebody =
        if let Some(len) = length {
            ResponseBody::from_reader_and_size(data, len)
        } else {
            ResponseBody::from_reader(data)
        };
    swap(&mut responsebody, &mut response.data);
    length
}

pub fn write_combined(
    outp: &mut impl Write,
    context: &PContext,
    response: &mut Response,
    duration: Duration,
) -> Result<()> {
    // Log the time the entry is made, not when the request started
    write!(outp, "{} - - [", context.client_ip())?;
    write_time(outp, SystemTime::now())?;
    let len = response_body_len(response);
    write!(outp, "] \"{}\" {} ", context.request_line(),
           response.status_code)?;
    match len {
        Some(len) => write!(outp, "{}", len)?,
        None => write!(outp, "-")?,
    }
    // We also add the handling duration at the end.
    writeln!(outp, " \"{}\" \"{}\" {:?}",
             context.referer().unwrap_or("-"),
             context.user_agent().unwrap_or("-"),
             duration)?;
    Ok(())
}

/// Best effort; a failed log write is reported but never fails the
/// request.
pub fn log_combined(context: &PContext, response: &mut Response, duration: Duration) {
    let mut outp = BufWriter::new(stderr().lock());
    if let Err(e) = write_combined(&mut outp, context, response, duration) {
        warn!("writing access log line: {e:#}");
    }
    let _ = outp.flush();
}
