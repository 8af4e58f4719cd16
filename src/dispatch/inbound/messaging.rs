//! Chat text, CTCP and server keepalive.

use tracing::debug;

use crate::chan::ChannelExt;
use crate::ctcp::encode_ctcp;
use crate::dispatch::Context;
use crate::event::Event;
use crate::message::{Command, Message};

pub(super) fn privmsg(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let (Some(from), Some(to), Some(text)) = (msg.short_prefix(), msg.param(0), msg.param(1))
    else {
        return;
    };
    let in_channel = to.is_channel_name();
    // Private conversations are keyed by the other party.
    let target = if in_channel { to } else { from };

    let Some(ctcp) = cmd.ctcp() else {
        ctx.link.emit(Event::Message {
            target: target.to_owned(),
            from: from.to_owned(),
            text: text.to_owned(),
        });
        return;
    };

    match ctcp.verb.as_str() {
        "ACTION" => ctx.link.emit(Event::Action {
            target: target.to_owned(),
            from: from.to_owned(),
            text: ctcp.params.clone().unwrap_or_default(),
        }),
        "VERSION" => match ctcp.params() {
            None if in_channel => debug!(from, channel = to, "ignoring channel VERSION query"),
            None => {
                let reply = encode_ctcp(None, from, "VERSION", Some(ctx.version_reply));
                ctx.link.send(reply.into_message());
                ctx.link.emit(Event::VersionRequested {
                    from: from.to_owned(),
                });
            }
            Some(version) => ctx.link.emit(Event::VersionReceived {
                from: from.to_owned(),
                version: version.to_owned(),
            }),
        },
        other => debug!(verb = other, from, "unhandled CTCP request"),
    }
}

pub(super) fn notice(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let Some(text) = msg.last_param() else {
        return;
    };
    ctx.link.emit(Event::Notice {
        from: msg.short_prefix().map(str::to_owned),
        text: text.to_owned(),
    });
}

pub(super) fn ping(ctx: &mut Context<'_>, cmd: &Command) {
    ctx.link.send(Message::new("PONG", cmd.message().param(0)));
}

pub(super) fn pong(_ctx: &mut Context<'_>, _cmd: &Command) {}
