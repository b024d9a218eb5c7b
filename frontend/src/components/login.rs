use crate::auth::{AuthFlow, AuthMode, AuthState, SubmitOutcome, use_auth};
use crate::components::icons::{Eye, EyeOff, GraduationCap};
use crate::web::router::use_router;
use eduweb_shared::Rol;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 字段错误提示
fn field_hint(state: RwSignal<AuthState>, field: &'static str) -> impl IntoView {
    move || {
        state.with(|s| s.field_error(field)).map(|msg| {
            view! { <span class="label-text-alt text-error mt-1">{msg}</span> }
        })
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let flow = StoredValue::new_local(AuthFlow::new(auth.api()));
    let state = RwSignal::from(flow.with_value(|f| f.state()));

    let is_submitting = move || state.with(AuthState::is_submitting);
    let mode = move || state.with(|s| s.mode);

    let on_login = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let flow = flow.get_value();
        spawn_local(async move {
            if flow.submit_login().await == SubmitOutcome::Succeeded {
                auth.mark_authenticated();
                router.navigate("/dashboard");
            }
        });
    };

    let on_register = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let flow = flow.get_value();
        spawn_local(async move {
            flow.submit_register().await;
        });
    };

    let submit_label = move |idle: &'static str, busy: &'static str| {
        move || {
            if is_submitting() {
                view! { <span class="loading loading-spinner"></span> {busy} }.into_any()
            } else {
                idle.into_any()
            }
        }
    };

    let login_form = move || {
        view! {
            <form class="card-body" on:submit=on_login>
                <div class="form-control">
                    <label class="label" for="username">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="username"
                        type="email"
                        placeholder="tu@email.com"
                        class="input input-bordered"
                        prop:value=move || state.with(|s| s.login.username.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            flow.with_value(|f| f.update_login(|l| l.username = value));
                        }
                    />
                    {field_hint(state, "username")}
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Contraseña"</span>
                    </label>
                    <div class="join w-full">
                        <input
                            id="password"
                            type=move || if state.with(|s| s.show_login_password) { "text" } else { "password" }
                            placeholder="••••••"
                            class="input input-bordered join-item w-full"
                            prop:value=move || state.with(|s| s.login.password.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                flow.with_value(|f| f.update_login(|l| l.password = value));
                            }
                        />
                        <button
                            type="button"
                            class="btn join-item"
                            on:click=move |_| flow.with_value(|f| f.toggle_login_password())
                        >
                            {move || if state.with(|s| s.show_login_password) {
                                view! { <EyeOff attr:class="h-4 w-4" /> }.into_any()
                            } else {
                                view! { <Eye attr:class="h-4 w-4" /> }.into_any()
                            }}
                        </button>
                    </div>
                    {field_hint(state, "password")}
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=is_submitting>
                        {submit_label("Iniciar sesión", "Ingresando...")}
                    </button>
                </div>
            </form>
        }
    };

    let register_form = move || {
        view! {
            <form class="card-body" on:submit=on_register>
                <div class="form-control">
                    <label class="label" for="nombre">
                        <span class="label-text">"Nombre"</span>
                    </label>
                    <input
                        id="nombre"
                        type="text"
                        class="input input-bordered"
                        prop:value=move || state.with(|s| s.register.nombre.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            flow.with_value(|f| f.update_register(|r| r.nombre = value));
                        }
                    />
                    {field_hint(state, "nombre")}
                </div>
                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="tu@email.com"
                        class="input input-bordered"
                        prop:value=move || state.with(|s| s.register.email.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            flow.with_value(|f| f.update_register(|r| r.email = value));
                        }
                    />
                    {field_hint(state, "email")}
                </div>
                <div class="form-control">
                    <label class="label" for="register-password">
                        <span class="label-text">"Contraseña"</span>
                    </label>
                    <div class="join w-full">
                        <input
                            id="register-password"
                            type=move || if state.with(|s| s.show_register_password) { "text" } else { "password" }
                            class="input input-bordered join-item w-full"
                            prop:value=move || state.with(|s| s.register.password.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                flow.with_value(|f| f.update_register(|r| r.password = value));
                            }
                        />
                        <button
                            type="button"
                            class="btn join-item"
                            on:click=move |_| flow.with_value(|f| f.toggle_register_password())
                        >
                            {move || if state.with(|s| s.show_register_password) {
                                view! { <EyeOff attr:class="h-4 w-4" /> }.into_any()
                            } else {
                                view! { <Eye attr:class="h-4 w-4" /> }.into_any()
                            }}
                        </button>
                    </div>
                    {field_hint(state, "password")}
                </div>
                <div class="form-control">
                    <label class="label" for="rol">
                        <span class="label-text">"Rol"</span>
                    </label>
                    <select
                        id="rol"
                        class="select select-bordered"
                        prop:value=move || state.with(|s| s.register.rol.as_str())
                        on:change=move |ev| {
                            if let Ok(rol) = event_target_value(&ev).parse::<Rol>() {
                                flow.with_value(|f| f.update_register(|r| r.rol = rol));
                            }
                        }
                    >
                        {Rol::ALL
                            .iter()
                            .map(|rol| view! { <option value=rol.as_str()>{rol.as_str()}</option> })
                            .collect_view()}
                    </select>
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=is_submitting>
                        {submit_label("Crear cuenta", "Registrando...")}
                    </button>
                </div>
            </form>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <GraduationCap attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"EduWeb"</h1>
                        <p class="text-base-content/70">
                            {move || match mode() {
                                AuthMode::Login => "Inicia sesión para administrar el contenido",
                                AuthMode::Register => "Crea una cuenta nueva",
                            }}
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show when=move || state.with(|s| s.error.is_some())>
                        <div role="alert" class="alert alert-error text-sm py-2 m-6 mb-0">
                            <span>{move || state.with(|s| s.error.clone().unwrap_or_default())}</span>
                        </div>
                    </Show>

                    {move || match mode() {
                        AuthMode::Login => login_form().into_any(),
                        AuthMode::Register => register_form().into_any(),
                    }}

                    <div class="text-center pb-6">
                        <button
                            type="button"
                            class="btn btn-link btn-sm"
                            on:click=move |_| flow.with_value(|f| f.switch_mode())
                        >
                            {move || match mode() {
                                AuthMode::Login => "¿No tienes cuenta? Regístrate",
                                AuthMode::Register => "¿Ya tienes cuenta? Inicia sesión",
                            }}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
