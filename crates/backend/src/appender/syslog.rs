//! Syslog appender for unix hosts.
//!
//! Records are rendered with the appender's layout and passed to `syslog(3)`
//! using the configured facility. The connection is opened with
//! `openlog(3)` when the first syslog appender is created; the identity
//! string of that first call is kept for the rest of the process, as
//! `syslog(3)` stores the pointer rather than copying it.

use std::ffi::CString;
use std::fmt;
use std::io;
use std::sync::OnceLock;

use super::Appender;
use crate::layout::Layout;
use crate::level::Level;
use crate::record::Record;

/// Identity used when the configured tag is unusable.
pub const DEFAULT_SYSLOG_TAG: &str = "hierlog";

/// Syslog facility codes matching the POSIX `LOG_*` constants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogFacility {
    /// LOG_KERN.
    Kern = libc::LOG_KERN,
    /// LOG_USER, the default for application logging.
    #[default]
    User = libc::LOG_USER,
    /// LOG_MAIL.
    Mail = libc::LOG_MAIL,
    /// LOG_DAEMON.
    Daemon = libc::LOG_DAEMON,
    /// LOG_AUTH.
    Auth = libc::LOG_AUTH,
    /// LOG_SYSLOG.
    Syslog = libc::LOG_SYSLOG,
    /// LOG_LPR.
    Lpr = libc::LOG_LPR,
    /// LOG_NEWS.
    News = libc::LOG_NEWS,
    /// LOG_UUCP.
    Uucp = libc::LOG_UUCP,
    /// LOG_CRON.
    Cron = libc::LOG_CRON,
    /// LOG_LOCAL0.
    Local0 = libc::LOG_LOCAL0,
    /// LOG_LOCAL1.
    Local1 = libc::LOG_LOCAL1,
    /// LOG_LOCAL2.
    Local2 = libc::LOG_LOCAL2,
    /// LOG_LOCAL3.
    Local3 = libc::LOG_LOCAL3,
    /// LOG_LOCAL4.
    Local4 = libc::LOG_LOCAL4,
    /// LOG_LOCAL5.
    Local5 = libc::LOG_LOCAL5,
    /// LOG_LOCAL6.
    Local6 = libc::LOG_LOCAL6,
    /// LOG_LOCAL7.
    Local7 = libc::LOG_LOCAL7,
}

const FACILITY_NAMES: [(&str, SyslogFacility); 18] = [
    ("kern", SyslogFacility::Kern),
    ("user", SyslogFacility::User),
    ("mail", SyslogFacility::Mail),
    ("daemon", SyslogFacility::Daemon),
    ("auth", SyslogFacility::Auth),
    ("syslog", SyslogFacility::Syslog),
    ("lpr", SyslogFacility::Lpr),
    ("news", SyslogFacility::News),
    ("uucp", SyslogFacility::Uucp),
    ("cron", SyslogFacility::Cron),
    ("local0", SyslogFacility::Local0),
    ("local1", SyslogFacility::Local1),
    ("local2", SyslogFacility::Local2),
    ("local3", SyslogFacility::Local3),
    ("local4", SyslogFacility::Local4),
    ("local5", SyslogFacility::Local5),
    ("local6", SyslogFacility::Local6),
    ("local7", SyslogFacility::Local7),
];

impl SyslogFacility {
    /// Parses a facility name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        FACILITY_NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, facility)| *facility)
    }

    /// Lower-case facility name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        FACILITY_NAMES
            .iter()
            .find(|(_, facility)| *facility == self)
            .map_or("user", |(name, _)| name)
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a record level to a `syslog(3)` severity.
const fn priority(level: Level) -> libc::c_int {
    match level {
        Level::Fatal => libc::LOG_CRIT,
        Level::Error => libc::LOG_ERR,
        Level::Warn => libc::LOG_WARNING,
        Level::Info => libc::LOG_INFO,
        Level::Debug | Level::Trace => libc::LOG_DEBUG,
    }
}

/// Appender sending records to the system logger.
#[derive(Debug)]
pub struct SyslogAppender {
    name: String,
    facility: SyslogFacility,
    layout: Layout,
}

impl SyslogAppender {
    /// Creates the appender and opens the syslog connection on first use.
    pub fn new(
        name: impl Into<String>,
        facility: SyslogFacility,
        tag: &str,
        layout: Layout,
    ) -> Self {
        open(tag, facility);
        Self {
            name: name.into(),
            facility,
            layout,
        }
    }

    /// Facility records are logged under.
    #[must_use]
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }
}

#[allow(unsafe_code)]
fn open(tag: &str, facility: SyslogFacility) {
    static IDENT: OnceLock<CString> = OnceLock::new();
    let mut first = false;
    let ident = IDENT.get_or_init(|| {
        first = true;
        CString::new(tag).unwrap_or_else(|_| c"hierlog".to_owned())
    });
    if first {
        // SAFETY: `ident` lives in a static for the rest of the process, as
        // openlog(3) keeps the pointer.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, facility as libc::c_int);
        }
    }
}

impl Appender for SyslogAppender {
    fn name(&self) -> &str {
        &self.name
    }

    #[allow(unsafe_code)]
    fn append(&self, record: &Record<'_>) -> io::Result<()> {
        let line = self.layout.format(record);
        let text = line.trim_end_matches('\n').replace('\0', " ");
        let message = CString::new(text).map_err(io::Error::other)?;
        // SAFETY: both strings are NUL-terminated and outlive the call; the
        // message is passed as an argument so `%` in it is not interpreted.
        unsafe {
            libc::syslog(
                priority(record.level()) | self.facility as libc::c_int,
                c"%s".as_ptr(),
                message.as_ptr(),
            );
        }
        Ok(())
    }
}
