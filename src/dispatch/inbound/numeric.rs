//! Numeric replies: topic on join and the NAMES cycle.

use crate::chan::ChannelExt;
use crate::dispatch::Context;
use crate::event::Event;
use crate::message::Command;

/// `332 <me> <channel> :<topic>`
pub(super) fn topic(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    if msg.params.len() < 3 {
        return;
    }
    let (Some(channel), Some(topic)) = (msg.param_from_end(2), msg.last_param()) else {
        return;
    };
    ctx.channels.entry(channel).topic = Some(topic.to_owned());
    ctx.link.emit(Event::TopicChanged {
        channel: channel.to_owned(),
        topic: Some(topic.to_owned()),
        set_by: None,
    });
}

/// `353 <me> <type> <channel> :<names...>`
pub(super) fn names(ctx: &mut Context<'_>, cmd: &Command) {
    let msg = cmd.message();
    let (Some(channel), Some(names)) = (msg.param_from_end(2), msg.last_param()) else {
        return;
    };
    if !channel.is_channel_name() {
        return;
    }
    ctx.channels
        .entry(channel)
        .roster
        .ingest_names(names.split_whitespace());
}

/// `366 <me> <channel> :End of /NAMES list.`
pub(super) fn end_of_names(ctx: &mut Context<'_>, cmd: &Command) {
    let Some(channel) = cmd.message().param_from_end(2) else {
        return;
    };
    let Some(chan) = ctx.channels.get_mut(channel) else {
        return;
    };
    chan.roster.end_of_names();
    ctx.link.emit(Event::NamesSynced {
        channel: channel.to_owned(),
    });
}
