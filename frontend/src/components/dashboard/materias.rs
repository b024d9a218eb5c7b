use super::{DashboardHandle, form_field, parse_number, use_dashboard};
use crate::components::icons::{Pencil, Plus, Trash2};
use eduweb_shared::Materia;
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn MateriasPanel() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body p-4">
                <div class="flex items-center justify-between">
                    <h2 class="card-title text-lg">
                        "Materias"
                        <span class="badge badge-neutral badge-sm">
                            {move || state.with(|s| s.materias.len())}
                        </span>
                    </h2>
                    <button
                        class="btn btn-primary btn-sm"
                        on:click=move |_| dashboard.with(|c| c.show_create_materia())
                    >
                        <Plus attr:class="h-4 w-4" />
                        "Nueva"
                    </button>
                </div>

                <Show
                    when=move || !state.with(|s| s.is_loading)
                    fallback=|| view! {
                        <div class="flex justify-center py-8">
                            <span class="loading loading-spinner loading-md"></span>
                        </div>
                    }
                >
                    <ul class="menu p-0 gap-1">
                        <For
                            each=move || state.with(|s| s.materias.clone())
                            key=|m| m.id.clone()
                            children=move |materia| materia_item(dashboard, materia)
                        />
                    </ul>
                </Show>
            </div>
        </div>

        <MateriaFormModal />
    }
}

fn materia_item(dashboard: DashboardHandle, materia: Materia) -> impl IntoView {
    let state = dashboard.state();
    let id = materia.id.clone();
    let selected = move || state.with(|s| s.is_materia_selected(&id));

    let on_select = {
        let materia = materia.clone();
        move |_| {
            let materia = materia.clone();
            dashboard.spawn(|c| async move { c.select_materia(materia).await });
        }
    };
    let on_edit = {
        let materia = materia.clone();
        move |ev: ev::MouseEvent| {
            ev.stop_propagation();
            dashboard.with(|c| c.edit_materia(materia.clone()));
        }
    };
    let on_delete = {
        let materia = materia.clone();
        move |ev: ev::MouseEvent| {
            ev.stop_propagation();
            let materia = materia.clone();
            dashboard.spawn(|c| async move { c.delete_materia(materia).await });
        }
    };

    view! {
        <li>
            <div class=move || if selected() { "flex justify-between active" } else { "flex justify-between" } on:click=on_select>
                <span>
                    <span class="badge badge-ghost badge-sm mr-2">{materia.orden}</span>
                    {materia.nombre.clone()}
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
fn MateriaFormModal() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();
    let error = move |field: &'static str| move || state.with(|s| s.materia_form.error(field));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        dashboard.spawn(|c| async move { c.save_materia().await });
    };

    view! {
        <Show when=move || state.with(|s| s.materia_form.visible)>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || if state.with(|s| s.materia_form.is_editing()) {
                            "Editar materia"
                        } else {
                            "Nueva materia"
                        }}
                    </h3>
                    <form class="space-y-2 mt-4" on:submit=on_submit>
                        {form_field(
                            "Nombre",
                            error("nombre"),
                            view! {
                                <input
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=move || state.with(|s| s.materia_form.values.nombre.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_materia_form(|f| f.nombre = value));
                                    }
                                />
                            },
                        )}
                        {form_field(
                            "Orden",
                            error("orden"),
                            view! {
                                <input
                                    type="number"
                                    min="1"
                                    class="input input-bordered w-full"
                                    prop:value=move || state.with(|s| s.materia_form.values.orden.to_string())
                                    on:input=move |ev| {
                                        let value = parse_number(&event_target_value(&ev));
                                        dashboard.with(|c| c.update_materia_form(|f| f.orden = value));
                                    }
                                />
                            },
                        )}
                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| dashboard.with(|c| c.cancel_materia_form())
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
