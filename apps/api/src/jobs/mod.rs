// Job requirements: the records candidates are ranked against.

pub mod handlers;
