//! Channel mode string parsing.

use super::ModeChange;

/// Modes that always consume an argument.
const ALWAYS_ARG: &[char] = &['b', 'e', 'I', 'k', 'o', 'v', 'h', 'a', 'q'];

/// Modes that consume an argument only when set.
const SET_ARG: &[char] = &['l', 'j', 'f'];

/// Parse channel mode pieces like `["+ov-v", "a", "b", "c"]`.
///
/// Parsing is lenient: a mode missing its argument is returned with
/// `arg: None`, unused arguments are ignored and letters before any sign
/// count as `+`.
pub fn parse_channel_modes(pieces: &[&str]) -> Vec<ModeChange> {
    let mut res = vec![];

    let Some((first, rest)) = pieces.split_first() else {
        return res;
    };
    let mut args = rest.iter().copied();
    let mut set = true;

    for c in first.chars() {
        match c {
            '+' => set = true,
            '-' => set = false,
            _ => {
                let takes_arg = ALWAYS_ARG.contains(&c) || (set && SET_ARG.contains(&c));
                let arg = if takes_arg {
                    args.next().map(str::to_owned)
                } else {
                    None
                };
                res.push(ModeChange { set, mode: c, arg });
            }
        }
    }

    res
}
