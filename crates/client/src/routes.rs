//! Application routing configuration.

use dioxus::prelude::*;

use crate::views::{
    AlertChannels, AttackEvents, Certificates, ConsoleLayout, IpGroups, MicroRules, NotFound,
    Sites,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[redirect("/", || Route::Sites {})]
    #[layout(ConsoleLayout)]
        #[route("/sites")]
        Sites {},
        #[route("/certificates")]
        Certificates {},
        #[route("/ip-groups")]
        IpGroups {},
        #[route("/micro-rules")]
        MicroRules {},
        #[route("/attack-events")]
        AttackEvents {},
        #[route("/alert-channels")]
        AlertChannels {},
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}
