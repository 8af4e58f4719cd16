//! Builders for commands typed by the user.
//!
//! Each handler receives the unsplit argument string and splits it as the
//! verb requires. Verbs that act on "this channel" use the context target.

use tracing::debug;

use crate::chan::ChannelExt;
use crate::ctcp::encode_ctcp;
use crate::event::Event;
use crate::message::Message;

use super::{Context, Dispatcher, UserCommand};

pub(super) fn register(dispatcher: &mut Dispatcher) {
    dispatcher.on_outbound("MSG", msg);
    dispatcher.on_outbound("ME", me);
    dispatcher.on_outbound("JOIN", join);
    dispatcher.on_outbound("J", join);
    dispatcher.on_outbound("PART", part);
    dispatcher.on_outbound("KICK", kick);
    dispatcher.on_outbound("OP", op);
    dispatcher.on_outbound("DEOP", deop);
    dispatcher.on_outbound("VOICE", voice);
    dispatcher.on_outbound("DEVOICE", devoice);
    dispatcher.on_outbound("TOPIC", topic);
}

/// Split off the first word.
fn split_first(args: &str) -> (&str, &str) {
    let args = args.trim();
    match args.split_once(' ') {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (args, ""),
    }
}

/// The context target, if it is a channel.
fn current_channel<'c>(ctx: &Context<'c>, verb: &str) -> Option<&'c str> {
    let channel = ctx.target.filter(|t| t.is_channel_name());
    if channel.is_none() {
        debug!(verb, "command needs a channel");
    }
    channel
}

/// `/MSG <target> <text>`
fn msg(ctx: &mut Context<'_>, cmd: &UserCommand) {
    let (target, text) = split_first(&cmd.args);
    if target.is_empty() || text.is_empty() {
        return;
    }
    ctx.link.send(Message::new("PRIVMSG", [target, text]));
    let from = ctx.nickname.clone();
    ctx.link.emit(Event::Message {
        target: target.to_owned(),
        from,
        text: text.to_owned(),
    });
}

/// `/ME <action>`
fn me(ctx: &mut Context<'_>, cmd: &UserCommand) {
    let Some(target) = ctx.target else {
        return;
    };
    if cmd.args.is_empty() {
        return;
    }
    let action = encode_ctcp(None, target, "ACTION", Some(cmd.args.as_str()));
    ctx.link.send(action.into_message());
    let from = ctx.nickname.clone();
    ctx.link.emit(Event::Action {
        target: target.to_owned(),
        from,
        text: cmd.args.clone(),
    });
}

/// `/JOIN <channel> [key]`
fn join(ctx: &mut Context<'_>, cmd: &UserCommand) {
    if cmd.args.is_empty() {
        return;
    }
    ctx.link
        .send(Message::new("JOIN", cmd.args.split_whitespace().take(2)));
}

/// `/PART [channel] [reason]`
fn part(ctx: &mut Context<'_>, cmd: &UserCommand) {
    let (first, rest) = split_first(&cmd.args);
    let (channel, reason) = if first.is_channel_name() {
        (first, rest)
    } else {
        let Some(channel) = current_channel(ctx, &cmd.verb) else {
            return;
        };
        (channel, cmd.args.trim())
    };
    ctx.link.send(Message::new("PART", [channel, reason]));
}

/// `/KICK <nick> [reason]`
fn kick(ctx: &mut Context<'_>, cmd: &UserCommand) {
    let Some(channel) = current_channel(ctx, &cmd.verb) else {
        return;
    };
    let (nick, reason) = split_first(&cmd.args);
    if nick.is_empty() {
        return;
    }
    ctx.link.send(Message::new("KICK", [channel, nick, reason]));
}

fn set_member_mode(ctx: &mut Context<'_>, cmd: &UserCommand, mode: &str) {
    let Some(channel) = current_channel(ctx, &cmd.verb) else {
        return;
    };
    let (nick, _) = split_first(&cmd.args);
    if nick.is_empty() {
        return;
    }
    ctx.link.send(Message::new("MODE", [channel, mode, nick]));
}

fn op(ctx: &mut Context<'_>, cmd: &UserCommand) {
    set_member_mode(ctx, cmd, "+o");
}

fn deop(ctx: &mut Context<'_>, cmd: &UserCommand) {
    set_member_mode(ctx, cmd, "-o");
}

fn voice(ctx: &mut Context<'_>, cmd: &UserCommand) {
    set_member_mode(ctx, cmd, "+v");
}

fn devoice(ctx: &mut Context<'_>, cmd: &UserCommand) {
    set_member_mode(ctx, cmd, "-v");
}

/// `/TOPIC [text]`; without text the server reports the current topic.
fn topic(ctx: &mut Context<'_>, cmd: &UserCommand) {
    let Some(channel) = current_channel(ctx, &cmd.verb) else {
        return;
    };
    ctx.link.send(Message::new("TOPIC", [channel, cmd.args.trim()]));
}
