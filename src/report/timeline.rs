//! ASCII-art phase timeline.
//!
//! Two layouts: https hops show a TLS Handshake column and a `pretransfer`
//! milestone, plaintext hops omit both. Phase columns are right-aligned to
//! seven digits, milestones left-aligned to nine characters.

use std::time::Duration;

use super::Style;
use crate::trace::{Milestones, Phases, TimingTrace};

fn millis(d: Duration) -> u128 {
    d.as_millis()
}

/// Renders the timeline block, or `None` when the trace is incomplete.
pub fn render_timeline(trace: &TimingTrace, style: Style) -> Option<String> {
    let phases = trace.phases()?;
    let milestones = trace.milestones()?;

    Some(match (phases.tls_handshake, milestones.pretransfer) {
        (Some(tls), Some(pretransfer)) => https_timeline(&phases, tls, &milestones, pretransfer, style),
        _ => http_timeline(&phases, &milestones, style),
    })
}

fn https_timeline(
    p: &Phases,
    tls: Duration,
    m: &Milestones,
    pretransfer: Duration,
    style: Style,
) -> String {
    let a = |d: Duration| style.cyan(&format!("{:>7}ms", millis(d)));
    let b = |d: Duration| style.cyan(&format!("{:<9}", format!("{}ms", millis(d))));

    let mut out = style.gray(
        16,
        "  DNS Lookup   TCP Connection   TLS Handshake   Server Processing   Content Transfer",
    );
    out.push('\n');
    out.push_str(&format!(
        "[{}  |     {}  |    {}  |        {}  |       {}  ]\n",
        a(p.dns_lookup),
        a(p.tcp_connection),
        a(tls),
        a(p.server_processing),
        a(p.content_transfer),
    ));
    out.push_str("            |                |               |                   |                  |\n");
    out.push_str(&format!(
        "   namelookup:{}      |               |                   |                  |\n",
        b(m.namelookup)
    ));
    out.push_str(&format!(
        "                       connect:{}     |                   |                  |\n",
        b(m.connect)
    ));
    out.push_str(&format!(
        "                                   pretransfer:{}         |                  |\n",
        b(pretransfer)
    ));
    out.push_str(&format!(
        "                                                     starttransfer:{}        |\n",
        b(m.starttransfer)
    ));
    out.push_str(&format!(
        "                                                                                total:{}\n",
        b(m.total)
    ));
    out
}

fn http_timeline(p: &Phases, m: &Milestones, style: Style) -> String {
    let a = |d: Duration| style.cyan(&format!("{:>7}ms", millis(d)));
    let b = |d: Duration| style.cyan(&format!("{:<9}", format!("{}ms", millis(d))));

    let mut out = style.gray(
        16,
        "   DNS Lookup   TCP Connection   Server Processing   Content Transfer",
    );
    out.push('\n');
    out.push_str(&format!(
        "[ {}  |     {}  |        {}  |       {}  ]\n",
        a(p.dns_lookup),
        a(p.tcp_connection),
        a(p.server_processing),
        a(p.content_transfer),
    ));
    out.push_str("             |                |                   |                  |\n");
    out.push_str(&format!(
        "    namelookup:{}      |                   |                  |\n",
        b(m.namelookup)
    ));
    out.push_str(&format!(
        "                        connect:{}         |                  |\n",
        b(m.connect)
    ));
    out.push_str(&format!(
        "                                      starttransfer:{}        |\n",
        b(m.starttransfer)
    ));
    out.push_str(&format!(
        "                                                                 total:{}\n",
        b(m.total)
    ));
    out
}
