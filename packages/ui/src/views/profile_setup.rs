use dioxus::prelude::*;
use store::forms::ProfileForm;
use store::Role;

use crate::components::{
    Button, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::{use_data, use_notifier};

/// First-run form, shown while the caller has no saved profile.
#[component]
pub fn ProfileSetup() -> Element {
    let mut data = use_data();
    let mut notifier = use_notifier();
    let mut form = use_signal(ProfileForm::default);
    let mut saving = use_signal(|| false);

    let save = move |_| {
        let profile = match form().validate() {
            Ok(profile) => profile,
            Err(e) => {
                notifier.error(&e.to_string());
                return;
            }
        };
        spawn(async move {
            saving.set(true);
            match data.peek().save_caller_user_profile(profile).await {
                Ok(()) => {
                    notifier.success("Profile saved!");
                    data.touch();
                }
                Err(e) => {
                    tracing::error!("Failed to save profile: {e}");
                    notifier.error("Failed to save profile");
                }
            }
            saving.set(false);
        });
    };

    let role_option = move |role: Role| {
        let selected = form().role == Some(role);
        rsx! {
            label { class: if selected { "role-option selected" } else { "role-option" },
                input {
                    r#type: "radio",
                    name: "role",
                    checked: selected,
                    onchange: move |_| form.write().role = Some(role),
                }
                "{role.label()}"
            }
        }
    };

    rsx! {
        div { class: "view-center",
            Card { class: "profile-setup",
                CardHeader {
                    CardTitle { "Welcome to SafeRide" }
                    CardDescription { "Tell us your name to get started" }
                }
                CardContent { class: "form-stack",
                    div { class: "form-field",
                        Label { html_for: "profile-name", "Your Name *" }
                        Input {
                            id: "profile-name",
                            placeholder: "Enter your name",
                            value: form().name,
                            oninput: move |evt: FormEvent| form.write().name = evt.value(),
                        }
                    }
                    div { class: "form-field",
                        Label { "I am a" }
                        div { class: "role-options",
                            {role_option(Role::Parent)}
                            {role_option(Role::Driver)}
                        }
                    }
                    Button { class: "w-full", disabled: saving(), onclick: save,
                        if saving() { Spinner { label: "Saving..." } } else { "Continue" }
                    }
                }
            }
        }
    }
}
