use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "bg-emerald-600 text-white hover:bg-emerald-500 focus:ring-emerald-500",
            ButtonVariant::Secondary => "border border-slate-600 bg-slate-800 text-slate-100 hover:bg-slate-700 focus:ring-slate-500",
            ButtonVariant::Ghost => "bg-transparent text-slate-300 hover:bg-slate-800 hover:text-white focus:ring-slate-500",
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ButtonProps {
    #[props(optional)]
    pub class: Option<String>,
    #[props(optional)]
    pub variant: Option<ButtonVariant>,
    /// `button` unless set, so buttons inside forms do not submit by accident.
    #[props(optional)]
    pub r#type: Option<String>,
    #[props(optional)]
    pub disabled: Option<bool>,
    #[props(optional)]
    pub onclick: Option<EventHandler<MouseEvent>>,
    pub children: Element,
}

#[component]
pub fn Button(props: ButtonProps) -> Element {
    let disabled = props.disabled.unwrap_or(false);
    let base = "inline-flex items-center justify-center gap-2 rounded-md px-3 py-1.5 text-sm font-medium transition-colors focus:outline-none focus:ring-2 disabled:cursor-not-allowed disabled:opacity-50";
    let variant = props.variant.unwrap_or_default().class();
    let class = match props.class.as_deref() {
        Some(extra) if !extra.is_empty() => format!("{base} {variant} {extra}"),
        _ => format!("{base} {variant}"),
    };

    rsx! {
        button {
            class,
            r#type: props.r#type.clone().unwrap_or_else(|| "button".to_string()),
            disabled,
            onclick: move |evt| {
                if disabled {
                    return;
                }
                if let Some(handler) = &props.onclick {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}
