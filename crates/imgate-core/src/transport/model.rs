//! Transport type model.
//!
//! Covers proprietary IM networks as well as other IM protocols. Each
//! transport maps to the disco identity it is advertised under; see the
//! gateway category of the XMPP registrar for the official type names.
//! Listing a transport here does not imply a session backend exists for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

use super::registry::TransportRegistry;
use crate::error::ImgateError;

/// The legacy networks the gateway knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// The AOL instant messaging service
    Aim,
    /// Facebook chat
    Facebook,
    /// The Gadu-Gadu instant messaging service
    GaduGadu,
    /// Google Talk (a special XMPP server)
    Gtalk,
    /// HTTP web service
    HttpWs,
    /// The ICQ instant messaging service
    Icq,
    /// Microsoft Live Communications service
    Lcs,
    /// IRC networks (not in the official registry)
    Irc,
    /// The MSN instant messaging service
    Msn,
    /// Microsoft Office Communications service
    Ocs,
    /// The QQ instant messaging service
    Qq,
    /// IBM Lotus Sametime
    Sametime,
    /// SIP/SIMPLE servers
    Simple,
    /// Short message service
    Sms,
    /// SMTP (email) bridge
    Smtp,
    /// Tlen IM service
    Tlen,
    /// XFire gaming and IM service
    Xfire,
    /// A gateway to other XMPP servers
    Xmpp,
    /// The Yahoo instant messaging service
    Yahoo,
    /// A service not covered by the other entries
    Other,
}

impl TransportType {
    /// Symbolic name used in configuration and for registry lookups.
    pub const fn symbolic_name(self) -> &'static str {
        match self {
            Self::Aim => "aim",
            Self::Facebook => "facebook",
            Self::GaduGadu => "gadugadu",
            Self::Gtalk => "gtalk",
            Self::HttpWs => "httpws",
            Self::Icq => "icq",
            Self::Lcs => "lcs",
            Self::Irc => "irc",
            Self::Msn => "msn",
            Self::Ocs => "ocs",
            Self::Qq => "qq",
            Self::Sametime => "sametime",
            Self::Simple => "simple",
            Self::Sms => "sms",
            Self::Smtp => "smtp",
            Self::Tlen => "tlen",
            Self::Xfire => "xfire",
            Self::Xmpp => "xmpp",
            Self::Yahoo => "yahoo",
            Self::Other => "other",
        }
    }

    /// The disco identity type advertised for this transport.
    pub const fn disco_identity(self) -> &'static str {
        match self {
            Self::GaduGadu => "gadu-gadu",
            Self::Gtalk | Self::Xmpp => "xmpp",
            Self::HttpWs => "http-ws",
            Self::Other => "unknown",
            other => other.symbolic_name(),
        }
    }

    /// Human readable network name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Aim => "AIM",
            Self::Facebook => "Facebook",
            Self::GaduGadu => "Gadu-Gadu",
            Self::Gtalk => "Google Talk",
            Self::HttpWs => "HTTP Web Service",
            Self::Icq => "ICQ",
            Self::Lcs => "Live Communications Server",
            Self::Irc => "IRC",
            Self::Msn => "MSN",
            Self::Ocs => "Office Communications Server",
            Self::Qq => "QQ",
            Self::Sametime => "Sametime",
            Self::Simple => "SIP/SIMPLE",
            Self::Sms => "SMS",
            Self::Smtp => "Email",
            Self::Tlen => "Tlen",
            Self::Xfire => "XFire",
            Self::Xmpp => "XMPP",
            Self::Yahoo => "Yahoo",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbolic_name())
    }
}

impl FromStr for TransportType {
    type Err = ImgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportRegistry::global()
            .lookup(s)
            .map(|descriptor| descriptor.transport)
    }
}
