//! Outbound social and documentation links.

use std::io;
use std::process::{Command, Stdio};

use teaser_config::LinksConfig;

/// Link values that mean "not configured yet".
const UNSET_PLACEHOLDERS: [&str; 2] = ["https://x.com/", "https://t.me/"];

/// Navigation target of enabled links: a new browser tab.
pub const NEW_TAB: &str = "_blank";

/// Icon shown in front of a link label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkIcon {
    X,
    Telegram,
    Discord,
    Docs,
}

impl LinkIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            LinkIcon::X => "✕",
            LinkIcon::Telegram => "➤",
            LinkIcon::Discord => "◆",
            LinkIcon::Docs => "≡",
        }
    }
}

/// A call-to-action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub label: &'static str,
    pub icon: LinkIcon,
    /// Trimmed destination, `None` when the link is disabled.
    pub href: Option<String>,
    /// Navigation target, `_blank` for enabled links.
    pub target: Option<&'static str>,
    pub rel: Option<&'static str>,
}

impl SocialLink {
    pub fn new(href: &str, label: &'static str, icon: LinkIcon) -> Self {
        let href = href.trim();
        let disabled = href.is_empty() || UNSET_PLACEHOLDERS.contains(&href);
        if disabled {
            Self {
                label,
                icon,
                href: None,
                target: None,
                rel: None,
            }
        } else {
            Self {
                label,
                icon,
                href: Some(href.to_string()),
                target: Some(NEW_TAB),
                rel: Some("noreferrer"),
            }
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.href.is_none()
    }
}

/// The page's call-to-action links, in display order.
pub fn social_links(links: &LinksConfig) -> Vec<SocialLink> {
    vec![
        SocialLink::new(&links.x, "Follow on X", LinkIcon::X),
        SocialLink::new(&links.telegram, "Join Telegram", LinkIcon::Telegram),
        SocialLink::new(&links.discord, "Join Discord", LinkIcon::Discord),
        SocialLink::new(&links.docs, "Docs", LinkIcon::Docs),
    ]
}

/// Open `url` in the system browser without waiting for it.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_links_disabled() {
        let link = SocialLink::new("https://x.com/", "Follow on X", LinkIcon::X);
        assert!(link.is_disabled());
        assert_eq!(link.target, None);
        assert_eq!(link.rel, None);

        assert!(SocialLink::new("https://t.me/", "Join Telegram", LinkIcon::Telegram).is_disabled());
        assert!(SocialLink::new("   ", "Docs", LinkIcon::Docs).is_disabled());
        assert!(SocialLink::new(" https://x.com/ ", "Follow on X", LinkIcon::X).is_disabled());
    }

    #[test]
    fn test_real_link_enabled() {
        let link = SocialLink::new("https://x.com/myhandle", "Follow on X", LinkIcon::X);
        assert!(!link.is_disabled());
        assert_eq!(link.href.as_deref(), Some("https://x.com/myhandle"));
        assert_eq!(link.target, Some("_blank"));
        assert_eq!(link.rel, Some("noreferrer"));
    }

    #[test]
    fn test_href_trimmed() {
        let link = SocialLink::new("  https://docs.memebattles.gg \n", "Docs", LinkIcon::Docs);
        assert_eq!(link.href.as_deref(), Some("https://docs.memebattles.gg"));
    }

    #[test]
    fn test_default_links() {
        let links = social_links(&LinksConfig::default());
        let enabled: Vec<bool> = links.iter().map(|l| !l.is_disabled()).collect();
        assert_eq!(enabled, vec![false, false, true, true]);
        assert_eq!(links[2].label, "Join Discord");
    }
}
