use super::{DashboardHandle, form_field, parse_number, use_dashboard};
use crate::components::icons::{Pencil, Plus, Trash2};
use eduweb_shared::Unidad;
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn UnidadesPanel() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();
    let materia_nombre = move || {
        state.with(|s| s.selected_materia.as_ref().map(|m| m.nombre.clone()))
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body p-4">
                <div class="flex items-center justify-between">
                    <div>
                        <h2 class="card-title text-lg">
                            "Unidades"
                            <span class="badge badge-neutral badge-sm">
                                {move || state.with(|s| s.unidades.len())}
                            </span>
                        </h2>
                        <p class="text-xs text-base-content/60">
                            {move || materia_nombre().unwrap_or_default()}
                        </p>
                    </div>
                    <button
                        class="btn btn-primary btn-sm"
                        disabled=move || materia_nombre().is_none()
                        on:click=move |_| dashboard.with(|c| c.show_create_unidad())
                    >
                        <Plus attr:class="h-4 w-4" />
                        "Nueva"
                    </button>
                </div>

                <Show
                    when=move || materia_nombre().is_some()
                    fallback=|| view! {
                        <p class="text-sm text-base-content/60 py-4">
                            "Selecciona una materia para ver sus unidades"
                        </p>
                    }
                >
                    <Show
                        when=move || state.with(|s| !s.unidades.is_empty())
                        fallback=|| view! {
                            <p class="text-sm text-base-content/60 py-4">"No hay unidades"</p>
                        }
                    >
                        <ul class="menu p-0 gap-1">
                            <For
                                each=move || state.with(|s| s.unidades.clone())
                                key=|u| u.resolve_key().unwrap_or_else(|| u.titulo.clone())
                                children=move |unidad| unidad_item(dashboard, unidad)
                            />
                        </ul>
                    </Show>
                </Show>
            </div>
        </div>

        <UnidadFormModal />
    }
}

fn unidad_item(dashboard: DashboardHandle, unidad: Unidad) -> impl IntoView {
    let state = dashboard.state();
    let selected = {
        let unidad = unidad.clone();
        move || state.with(|s| s.is_unidad_selected(&unidad))
    };

    let on_select = {
        let unidad = unidad.clone();
        move |_| {
            let unidad = unidad.clone();
            dashboard.spawn(|c| async move { c.select_unidad(unidad).await });
        }
    };
    let on_edit = {
        let unidad = unidad.clone();
        move |ev: ev::MouseEvent| {
            ev.stop_propagation();
            dashboard.with(|c| c.edit_unidad(unidad.clone()));
        }
    };
    let on_delete = {
        let unidad = unidad.clone();
        move |ev: ev::MouseEvent| {
            ev.stop_propagation();
            let unidad = unidad.clone();
            dashboard.spawn(|c| async move { c.delete_unidad(unidad).await });
        }
    };

    view! {
        <li>
            <div class=move || if selected() { "flex justify-between active" } else { "flex justify-between" } on:click=on_select>
                <span class="flex flex-col items-start">
                    <span>
                        <span class="badge badge-ghost badge-sm mr-2">{unidad.numero}</span>
                        {unidad.titulo.clone()}
                    </span>
                    <span class="text-xs text-base-content/60">{unidad.descripcion.clone()}</span>
                </span>
                <span class="flex gap-1">
                    <button class="btn btn-ghost btn-xs" title="Editar" on:click=on_edit>
                        <Pencil attr:class="h-3 w-3" />
                    </button>
                    <button class="btn btn-ghost btn-xs text-error" title="Eliminar" on:click=on_delete>
                        <Trash2 attr:class="h-3 w-3" />
                    </button>
                </span>
            </div>
        </li>
    }
}

#[component]
fn UnidadFormModal() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();
    let error = move |field: &'static str| move || state.with(|s| s.unidad_form.error(field));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        dashboard.spawn(|c| async move { c.save_unidad().await });
    };

    view! {
        <Show when=move || state.with(|s| s.unidad_form.visible)>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || if state.with(|s| s.unidad_form.is_editing()) {
                            "Editar unidad"
                        } else {
                            "Nueva unidad"
                        }}
                    </h3>
                    <form class="space-y-2 mt-4" on:submit=on_submit>
                        {form_field(
                            "Número",
                            error("numero"),
                            view! {
                                <input
                                    type="number"
                                    min="1"
                                    class="input input-bordered w-full"
                                    prop:value=move || state.with(|s| s.unidad_form.values.numero.to_string())
                                    on:input=move |ev| {
                                        let value = parse_number(&event_target_value(&ev));
                                        dashboard.with(|c| c.update_unidad_form(|f| f.numero = value));
                                    }
                                />
                            },
                        )}
                        {form_field(
                            "Título",
                            error("titulo"),
                            view! {
                                <input
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=move || state.with(|s| s.unidad_form.values.titulo.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_unidad_form(|f| f.titulo = value));
                                    }
                                />
                            },
                        )}
                        {form_field(
                            "Descripción",
                            error("descripcion"),
                            view! {
                                <textarea
                                    class="textarea textarea-bordered w-full"
                                    rows="3"
                                    prop:value=move || state.with(|s| s.unidad_form.values.descripcion.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_unidad_form(|f| f.descripcion = value));
                                    }
                                ></textarea>
                            },
                        )}
                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| dashboard.with(|c| c.cancel_unidad_form())
                            >
                                "Cancelar"
                            </button>
                            <button type="submit" class="btn btn-primary">"Guardar"</button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
