//! Handlers for commands received from the server.

mod channel;
mod messaging;
mod numeric;

use crate::response::Response;

use super::Dispatcher;

pub(super) fn register(dispatcher: &mut Dispatcher) {
    dispatcher.on_inbound("JOIN", channel::join);
    dispatcher.on_inbound("PART", channel::part);
    dispatcher.on_inbound("KICK", channel::kick);
    dispatcher.on_inbound("QUIT", channel::quit);
    dispatcher.on_inbound("NICK", channel::nick);
    dispatcher.on_inbound("MODE", channel::mode);
    dispatcher.on_inbound("TOPIC", channel::topic);

    dispatcher.on_inbound("PRIVMSG", messaging::privmsg);
    dispatcher.on_inbound("NOTICE", messaging::notice);
    dispatcher.on_inbound("PING", messaging::ping);
    dispatcher.on_inbound("PONG", messaging::pong);

    dispatcher.on_inbound(Response::RPL_TOPIC.verb(), numeric::topic);
    dispatcher.on_inbound(Response::RPL_NAMREPLY.verb(), numeric::names);
    dispatcher.on_inbound(Response::RPL_ENDOFNAMES.verb(), numeric::end_of_names);
}
