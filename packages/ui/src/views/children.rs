use dioxus::prelude::*;
use store::forms::ChildProfileForm;
use store::ChildProfile;

use crate::components::{
    Badge, Button, Card, CardContent, CardDescription, CardHeader, CardTitle, Dialog, Input,
    Label, Spinner, Textarea,
};
use crate::icons::{FaCircleExclamation, FaPhone, FaPlus, FaUser};
use crate::{use_data, use_notifier, use_query, Icon};

use super::common::{DetailRow, EmptyState, LoadError, Loading};

/// The parent's children, with an "Add Child" dialog.
#[component]
pub fn ChildrenManagement() -> Element {
    let children = use_query(|data| async move { data.child_profiles().await });
    let mut open = use_signal(|| false);

    rsx! {
        div { class: "view-section",
            div { class: "section-header",
                div {
                    h3 { class: "view-section-title", "Children Profiles" }
                    p { class: "view-muted", "Manage your children's information" }
                }
                Button { onclick: move |_| open.set(true),
                    Icon { icon: FaPlus, width: 14, height: 14 }
                    " Add Child"
                }
            }

            match &*children.read() {
                None => rsx! { Loading {} },
                Some(Err(e)) => rsx! { LoadError { what: "children", error: e.clone() } },
                Some(Ok(list)) if list.is_empty() => rsx! {
                    EmptyState {
                        title: "No children added yet",
                        text: "Add your first child to start booking trips",
                        Icon { icon: FaUser, width: 40, height: 40 }
                    }
                },
                Some(Ok(list)) => rsx! {
                    div { class: "card-grid",
                        for child in list.iter().cloned() {
                            ChildCard { key: "{child.id}", child }
                        }
                    }
                },
            }

            if open() {
                AddChildDialog { on_close: move |_| open.set(false) }
            }
        }
    }
}

#[component]
fn ChildCard(child: ChildProfile) -> Element {
    rsx! {
        Card {
            CardHeader {
                CardTitle { class: "with-icon",
                    Icon { icon: FaUser, width: 16, height: 16 }
                    "{child.name}"
                }
                CardDescription { Badge { "{child.grade}" } }
            }
            CardContent { class: "detail-list",
                DetailRow { label: "Emergency Contact", value: child.emergency_contact.clone(),
                    Icon { icon: FaPhone, width: 14, height: 14 }
                }
                if let Some(allergies) = child.allergies.clone() {
                    DetailRow { label: "Allergies", value: allergies,
                        Icon { icon: FaCircleExclamation, width: 14, height: 14 }
                    }
                }
            }
        }
    }
}

#[component]
fn AddChildDialog(on_close: EventHandler<()>) -> Element {
    let mut data = use_data();
    let mut notifier = use_notifier();
    let mut form = use_signal(ChildProfileForm::default);
    let mut pending = use_signal(|| false);

    let submit = move |_| {
        if pending() {
            return;
        }
        let child = match form().validate() {
            Ok(child) => child,
            Err(e) => {
                notifier.error(&e.to_string());
                return;
            }
        };
        spawn(async move {
            pending.set(true);
            match data.peek().create_child_profile(child).await {
                Ok(id) => {
                    tracing::info!(%id, "child profile created");
                    notifier.success("Child profile created successfully!");
                    form.write().clear();
                    data.touch();
                    pending.set(false);
                    on_close.call(());
                }
                Err(e) => {
                    tracing::error!("Create child error: {e}");
                    notifier.error("Failed to create child profile");
                    pending.set(false);
                }
            }
        });
    };

    rsx! {
        Dialog {
            title: "Add Child Profile",
            description: "Enter your child's information for safe transportation",
            on_close: move |_| {
                if !pending() {
                    on_close.call(());
                }
            },
            div { class: "form-stack",
                div { class: "form-field",
                    Label { html_for: "name", "Child's Name *" }
                    Input {
                        id: "name",
                        placeholder: "Enter child's full name",
                        value: form().name,
                        oninput: move |evt: FormEvent| form.write().name = evt.value(),
                    }
                }
                div { class: "form-field",
                    Label { html_for: "grade", "Grade *" }
                    Input {
                        id: "grade",
                        placeholder: "e.g., Grade 5",
                        value: form().grade,
                        oninput: move |evt: FormEvent| form.write().grade = evt.value(),
                    }
                }
                div { class: "form-field",
                    Label { html_for: "allergies", "Allergies (Optional)" }
                    Textarea {
                        id: "allergies",
                        placeholder: "List any allergies or medical conditions",
                        value: form().allergies,
                        rows: 3,
                        oninput: move |evt: FormEvent| form.write().allergies = evt.value(),
                    }
                }
                div { class: "form-field",
                    Label { html_for: "emergency", "Emergency Contact *" }
                    Input {
                        id: "emergency",
                        r#type: "tel",
                        placeholder: "Phone number",
                        value: form().emergency_contact,
                        oninput: move |evt: FormEvent| form.write().emergency_contact = evt.value(),
                    }
                }
                Button { class: "w-full", disabled: pending(), onclick: submit,
                    if pending() { Spinner { label: "Adding..." } } else { "Add Child" }
                }
            }
        }
    }
}
