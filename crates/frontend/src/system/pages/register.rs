use contracts::system::auth::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::context::{go, use_app_context};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let context = use_app_context();
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_saving, set_is_saving) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let request = RegisterRequest {
            username: username.get(),
            password: password.get(),
            email: email.get(),
            full_name: full_name.get(),
            phone: Some(phone.get()).filter(|p| !p.is_empty()),
        };

        set_is_saving.set(true);
        set_error_message.set(None);

        let (store, login) =
            context.with_value(|c| (c.store.clone(), c.config.routes.login.clone()));
        spawn_local(async move {
            match store.register(request).await {
                Ok(_) => {
                    set_is_saving.set(false);
                    go(context, &login);
                }
                Err(e) => {
                    set_error_message.set(Some(format!("Registration failed: {}", e)));
                    set_is_saving.set(false);
                }
            }
        });
    };

    let field = move |id: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      value: ReadSignal<String>,
                      set: WriteSignal<String>| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type=kind
                    id=id
                    value=move || value.get()
                    on:input=move |ev| set.set(event_target_value(&ev))
                    disabled=move || is_saving.get()
                />
            </div>
        }
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h2>"Create account"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    {field("username", "Username *", "text", username, set_username)}
                    {field("password", "Password *", "password", password, set_password)}
                    {field("email", "Email *", "email", email, set_email)}
                    {field("full_name", "Full name *", "text", full_name, set_full_name)}
                    {field("phone", "Phone", "tel", phone, set_phone)}

                    <button type="submit" class="btn-primary" disabled=move || is_saving.get()>
                        "Register"
                    </button>
                </form>

                <button class="btn-link" on:click=move |_| go(context, "/login")>
                    "Back to sign in"
                </button>
            </div>
        </div>
    }
}
