use super::{DashboardHandle, form_field, use_dashboard};
use crate::components::icons::{Pencil, Plus, Trash2};
use eduweb_shared::{Dificultad, Ejercicio, TipoEjercicio};
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn EjerciciosPanel() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();
    let has_unidad = move || state.with(|s| s.selected_unidad.is_some());

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body p-4">
                <div class="flex items-center justify-between">
                    <h2 class="card-title text-lg">
                        "Ejercicios"
                        <span class="badge badge-neutral badge-sm">
                            {move || state.with(|s| s.ejercicios.len())}
                        </span>
                    </h2>
                    <button
                        class="btn btn-primary btn-sm"
                        disabled=move || !has_unidad()
                        on:click=move |_| dashboard.with(|c| c.show_create_ejercicio())
                    >
                        <Plus attr:class="h-4 w-4" />
                        "Nuevo"
                    </button>
                </div>

                <Show
                    when=has_unidad
                    fallback=|| view! {
                        <p class="text-sm text-base-content/60 py-4">
                            "Selecciona una unidad para ver sus ejercicios"
                        </p>
                    }
                >
                    <Show
                        when=move || state.with(|s| !s.ejercicios.is_empty())
                        fallback=|| view! {
                            <p class="text-sm text-base-content/60 py-4">"No hay ejercicios"</p>
                        }
                    >
                        <div class="overflow-x-auto">
                            <table class="table table-sm">
                                <thead>
                                    <tr>
                                        <th>"Enunciado"</th>
                                        <th>"Tema"</th>
                                        <th>"Tipo"</th>
                                        <th>"Dificultad"</th>
                                        <th>"Respuesta"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || state.with(|s| s.ejercicios.clone())
                                        key=|e| e.id.clone()
                                        children=move |ejercicio| ejercicio_row(dashboard, ejercicio)
                                    />
                                </tbody>
                            </table>
                        </div>
                    </Show>
                </Show>
            </div>
        </div>

        <EjercicioFormModal />
    }
}

fn ejercicio_row(dashboard: DashboardHandle, ejercicio: Ejercicio) -> impl IntoView {
    let on_edit = {
        let ejercicio = ejercicio.clone();
        move |_| dashboard.with(|c| c.edit_ejercicio(ejercicio.clone()))
    };
    let on_delete = {
        let ejercicio = ejercicio.clone();
        move |_| {
            let ejercicio = ejercicio.clone();
            dashboard.spawn(|c| async move { c.delete_ejercicio(ejercicio).await });
        }
    };
    let opciones = ejercicio.opciones.clone().unwrap_or_default().join(" · ");

    view! {
        <tr>
            <td>
                <div>{ejercicio.enunciado.clone()}</div>
                <div class="text-xs text-base-content/60">{opciones}</div>
            </td>
            <td class="font-mono text-xs">{ejercicio.tema_id.clone()}</td>
            <td><span class="badge badge-outline badge-sm">{ejercicio.tipo.label()}</span></td>
            <td><span class="badge badge-ghost badge-sm">{ejercicio.dificultad.as_str()}</span></td>
            <td>{ejercicio.respuesta_correcta.clone().unwrap_or_default()}</td>
            <td class="flex gap-1 justify-end">
                <button class="btn btn-ghost btn-xs" title="Editar" on:click=on_edit>
                    <Pencil attr:class="h-3 w-3" />
                </button>
                <button class="btn btn-ghost btn-xs text-error" title="Eliminar" on:click=on_delete>
                    <Trash2 attr:class="h-3 w-3" />
                </button>
            </td>
        </tr>
    }
}

#[component]
fn EjercicioFormModal() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();
    let error = move |field: &'static str| move || state.with(|s| s.ejercicio_form.error(field));
    let values = move || state.with(|s| s.ejercicio_form.values.clone());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        dashboard.spawn(|c| async move { c.save_ejercicio().await });
    };

    // 可选主题：当前单元下的内容
    let temas = move || {
        state.with(|s| {
            s.contenidos
                .iter()
                .map(|c| (c.key().to_string(), c.nombre_tema.clone()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <Show when=move || state.with(|s| s.ejercicio_form.visible)>
            <div class="modal modal-open">
                <div class="modal-box max-w-2xl">
                    <h3 class="font-bold text-lg">
                        {move || if state.with(|s| s.ejercicio_form.is_editing()) {
                            "Editar ejercicio"
                        } else {
                            "Nuevo ejercicio"
                        }}
                    </h3>
                    <form class="space-y-2 mt-4" on:submit=on_submit>
                        {form_field(
                            "Tema",
                            error("tema_id"),
                            view! {
                                <select
                                    class="select select-bordered w-full"
                                    prop:value=move || values().tema_id
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_ejercicio_form(|f| f.tema_id = value));
                                    }
                                >
                                    <option value="">"Primer contenido de la unidad"</option>
                                    {move || {
                                        temas()
                                            .into_iter()
                                            .map(|(key, nombre)| view! { <option value=key>{nombre}</option> })
                                            .collect_view()
                                    }}
                                </select>
                            },
                        )}
                        {form_field(
                            "Enunciado",
                            error("enunciado"),
                            view! {
                                <textarea
                                    class="textarea textarea-bordered w-full"
                                    rows="3"
                                    prop:value=move || values().enunciado
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_ejercicio_form(|f| f.enunciado = value));
                                    }
                                ></textarea>
                            },
                        )}
                        <div class="grid grid-cols-2 gap-2">
                            {form_field(
                                "Tipo",
                                error("tipo"),
                                view! {
                                    <select
                                        class="select select-bordered w-full"
                                        prop:value=move || values().tipo.as_str()
                                        on:change=move |ev| {
                                            if let Ok(tipo) = event_target_value(&ev).parse::<TipoEjercicio>() {
                                                dashboard.with(|c| c.update_ejercicio_form(|f| f.tipo = tipo));
                                            }
                                        }
                                    >
                                        {TipoEjercicio::ALL
                                            .iter()
                                            .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                                            .collect_view()}
                                    </select>
                                },
                            )}
                            {form_field(
                                "Dificultad",
                                error("dificultad"),
                                view! {
                                    <select
                                        class="select select-bordered w-full"
                                        prop:value=move || values().dificultad.as_str()
                                        on:change=move |ev| {
                                            if let Ok(d) = event_target_value(&ev).parse::<Dificultad>() {
                                                dashboard.with(|c| c.update_ejercicio_form(|f| f.dificultad = d));
                                            }
                                        }
                                    >
                                        {Dificultad::ALL
                                            .iter()
                                            .map(|d| view! { <option value=d.as_str()>{d.as_str()}</option> })
                                            .collect_view()}
                                    </select>
                                },
                            )}
                        </div>
                        <Show when=move || values().tipo.uses_options()>
                            {form_field(
                                "Opciones (separadas por comas)",
                                error("opciones"),
                                view! {
                                    <input
                                        type="text"
                                        class="input input-bordered w-full"
                                        placeholder="A, B, C, D"
                                        prop:value=move || values().opciones
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            dashboard.with(|c| c.update_ejercicio_form(|f| f.opciones = value));
                                        }
                                    />
                                },
                            )}
                        </Show>
                        {form_field(
                            "Respuesta correcta",
                            error("respuesta_correcta"),
                            view! {
                                <input
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=move || values().respuesta_correcta
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_ejercicio_form(|f| f.respuesta_correcta = value));
                                    }
                                />
                            },
                        )}
                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| dashboard.with(|c| c.cancel_ejercicio_form())
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
