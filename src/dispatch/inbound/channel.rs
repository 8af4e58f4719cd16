//! Membership and channel-property changes.

use tracing::debug;

use crate::chan::ChannelExt;
use crate::dispatch::Context;
use crate::event::Event;
use crate::message::Command;
use crate::mode::parse_channel_modes;

pub(super) fn join(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let (Some(nick), Some(channel)) = (msg.short_prefix(), msg.param(0)) else {
        return;
    };
    ctx.channels.entry(channel).roster.add(nick);
    ctx.link.emit(Event::UserJoined {
        channel: channel.to_owned(),
        nick: nick.to_owned(),
    });
}

pub(super) fn part(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let (Some(nick), Some(channel)) = (msg.short_prefix(), msg.param(0)) else {
        return;
    };
    leave(ctx, channel, nick);
    ctx.link.emit(Event::UserLeft {
        channel: channel.to_owned(),
        nick: nick.to_owned(),
        reason: msg.param(1).map(str::to_owned),
    });
}

pub(super) fn kick(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let (Some(channel), Some(nick)) = (msg.param(0), msg.param(1)) else {
        return;
    };
    leave(ctx, channel, nick);
    ctx.link.emit(Event::UserKicked {
        channel: channel.to_owned(),
        nick: nick.to_owned(),
        by: msg.short_prefix().map(str::to_owned),
        reason: msg.param(2).map(str::to_owned),
    });
}

pub(super) fn quit(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let Some(nick) = msg.short_prefix() else {
        return;
    };
    for channel in ctx.channels.containing(nick) {
        if let Some(chan) = ctx.channels.get_mut(&channel) {
            chan.roster.remove(nick);
        }
        ctx.link.emit(Event::UserQuit {
            channel,
            nick: nick.to_owned(),
            reason: msg.param(0).map(str::to_owned),
        });
    }
}

pub(super) fn nick(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let (Some(old), Some(new)) = (msg.short_prefix(), msg.param(0)) else {
        return;
    };
    if ctx.is_me(old) {
        *ctx.nickname = new.to_owned();
    }
    for channel in ctx.channels.containing(old) {
        if let Some(chan) = ctx.channels.get_mut(&channel) {
            chan.roster.rename(old, new);
        }
        ctx.link.emit(Event::UserRenamed {
            channel,
            old_nick: old.to_owned(),
            new_nick: new.to_owned(),
        });
    }
}

/// Apply `+o/-o/+v/-v` changes; other modes only consume their arguments.
pub(super) fn mode(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let Some(channel) = msg.param(0).filter(|t| t.is_channel_name()) else {
        return;
    };
    let pieces: Vec<&str> = msg.params[1..].iter().map(String::as_str).collect();
    let set_by = msg.short_prefix();

    for change in parse_channel_modes(&pieces) {
        let (Some(mode), Some(nick)) = (change.member_mode(), change.arg.as_deref()) else {
            continue;
        };
        let Some(chan) = ctx.channels.get_mut(channel) else {
            debug!(channel, "mode change for unknown channel");
            return;
        };
        chan.roster.set_mode(nick, mode, change.set);
        ctx.link.emit(Event::ModeChanged {
            channel: channel.to_owned(),
            nick: nick.to_owned(),
            mode: change.to_string(),
            set_by: set_by.map(str::to_owned),
        });
    }
}

pub(super) fn topic(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let Some(channel) = msg.param(0) else {
        return;
    };
    let topic = msg.param(1).map(str::to_owned);
    if let Some(chan) = ctx.channels.get_mut(channel) {
        chan.topic = topic.clone();
    }
    ctx.link.emit(Event::TopicChanged {
        channel: channel.to_owned(),
        topic,
        set_by: msg.short_prefix().map(str::to_owned),
    });
}

/// Drop `nick` from `channel`, or the whole channel when `nick` is us.
fn leave(ctx: &mut Context<'_>, channel: &str, nick: &str) {
    if ctx.is_me(nick) {
        ctx.channels.remove(channel);
    } else if let Some(chan) = ctx.channels.get_mut(channel) {
        chan.roster.remove(nick);
    }
}
