use super::{DashboardHandle, form_field, parse_number, use_dashboard};
use crate::components::icons::{BookOpen, Eye, Pencil, Plus, Trash2, X};
use eduweb_shared::{Contenido, Ejercicio};
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn ContenidosPanel() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();
    let unidad_titulo = move || {
        state.with(|s| s.selected_unidad.as_ref().map(|u| u.titulo.clone()))
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body p-4">
                <div class="flex items-center justify-between">
                    <div>
                        <h2 class="card-title text-lg">
                            "Contenidos"
                            <span class="badge badge-neutral badge-sm">
                                {move || state.with(|s| s.contenidos.len())}
                            </span>
                        </h2>
                        <p class="text-xs text-base-content/60">
                            {move || unidad_titulo().unwrap_or_default()}
                        </p>
                    </div>
                    <button
                        class="btn btn-primary btn-sm"
                        disabled=move || unidad_titulo().is_none()
                        on:click=move |_| dashboard.with(|c| c.show_create_contenido())
                    >
                        <Plus attr:class="h-4 w-4" />
                        "Nuevo"
                    </button>
                </div>

                <Show
                    when=move || unidad_titulo().is_some()
                    fallback=|| view! {
                        <p class="text-sm text-base-content/60 py-4">
                            "Selecciona una unidad para ver sus contenidos"
                        </p>
                    }
                >
                    <Show
                        when=move || state.with(|s| !s.contenidos.is_empty())
                        fallback=|| view! {
                            <p class="text-sm text-base-content/60 py-4">"No hay contenidos"</p>
                        }
                    >
                        <ul class="space-y-2">
                            <For
                                each=move || state.with(|s| s.contenidos.clone())
                                key=|c| c.key().to_string()
                                children=move |contenido| contenido_item(dashboard, contenido)
                            />
                        </ul>
                    </Show>
                </Show>
            </div>
        </div>

        <ContenidoFormModal />
    }
}

fn contenido_item(dashboard: DashboardHandle, contenido: Contenido) -> impl IntoView {
    let on_view = {
        let contenido = contenido.clone();
        move |_| {
            let contenido = contenido.clone();
            dashboard.spawn(|c| async move { c.view_contenido(contenido).await });
        }
    };
    let on_edit = {
        let contenido = contenido.clone();
        move |_| dashboard.with(|c| c.edit_contenido(contenido.clone()))
    };
    let on_delete = {
        let contenido = contenido.clone();
        move |_| {
            let contenido = contenido.clone();
            dashboard.spawn(|c| async move { c.delete_contenido(contenido).await });
        }
    };

    view! {
        <li class="p-3 rounded-box bg-base-200 flex justify-between items-start gap-2">
            <div class="min-w-0">
                <div class="font-medium">
                    <span class="badge badge-ghost badge-sm mr-2">{contenido.numero}</span>
                    {contenido.nombre_tema.clone()}
                </div>
                <div class="text-xs text-base-content/60 truncate">
                    {contenido.descripcion.clone().unwrap_or_default()}
                </div>
                <div class="text-xs font-mono text-base-content/40">{contenido.key().to_string()}</div>
            </div>
            <div class="flex gap-1 shrink-0">
                <button class="btn btn-ghost btn-xs" title="Ver" on:click=on_view>
                    <Eye attr:class="h-3 w-3" />
                </button>
                <button class="btn btn-ghost btn-xs" title="Editar" on:click=on_edit>
                    <Pencil attr:class="h-3 w-3" />
                </button>
                <button class="btn btn-ghost btn-xs text-error" title="Eliminar" on:click=on_delete>
                    <Trash2 attr:class="h-3 w-3" />
                </button>
            </div>
        </li>
    }
}

#[component]
fn ContenidoFormModal() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();
    let error = move |field: &'static str| move || state.with(|s| s.contenido_form.error(field));
    let is_editing = move || state.with(|s| s.contenido_form.is_editing());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        dashboard.spawn(|c| async move { c.save_contenido().await });
    };

    view! {
        <Show when=move || state.with(|s| s.contenido_form.visible)>
            <div class="modal modal-open">
                <div class="modal-box max-w-2xl">
                    <h3 class="font-bold text-lg">
                        {move || if is_editing() { "Editar contenido" } else { "Nuevo contenido" }}
                    </h3>
                    <form class="space-y-2 mt-4" on:submit=on_submit>
                        // 主题 ID 创建后不可修改
                        {form_field(
                            "Tema ID",
                            error("tema_id"),
                            view! {
                                <input
                                    type="text"
                                    class="input input-bordered w-full font-mono"
                                    readonly=is_editing
                                    prop:value=move || state.with(|s| s.contenido_form.values.tema_id.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_contenido_form(|f| f.tema_id = value));
                                    }
                                />
                            },
                        )}
                        <div class="grid grid-cols-4 gap-2">
                            <div class="col-span-3">
                                {form_field(
                                    "Nombre del tema",
                                    error("nombre_tema"),
                                    view! {
                                        <input
                                            type="text"
                                            class="input input-bordered w-full"
                                            prop:value=move || state.with(|s| s.contenido_form.values.nombre_tema.clone())
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                dashboard.with(|c| c.update_contenido_form(|f| f.nombre_tema = value));
                                            }
                                        />
                                    },
                                )}
                            </div>
                            {form_field(
                                "Número",
                                error("numero"),
                                view! {
                                    <input
                                        type="number"
                                        min="1"
                                        class="input input-bordered w-full"
                                        prop:value=move || state.with(|s| s.contenido_form.values.numero.to_string())
                                        on:input=move |ev| {
                                            let value = parse_number(&event_target_value(&ev));
                                            dashboard.with(|c| c.update_contenido_form(|f| f.numero = value));
                                        }
                                    />
                                },
                            )}
                        </div>
                        {form_field(
                            "Descripción",
                            error("descripcion"),
                            view! {
                                <input
                                    type="text"
                                    class="input input-bordered w-full"
                                    prop:value=move || state.with(|s| s.contenido_form.values.descripcion.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_contenido_form(|f| f.descripcion = value));
                                    }
                                />
                            },
                        )}
                        {form_field(
                            "Texto (Markdown)",
                            error("texto_markdown"),
                            view! {
                                <textarea
                                    class="textarea textarea-bordered w-full font-mono"
                                    rows="10"
                                    prop:value=move || state.with(|s| s.contenido_form.values.texto_markdown.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        dashboard.with(|c| c.update_contenido_form(|f| f.texto_markdown = value));
                                    }
                                ></textarea>
                            },
                        )}
                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| dashboard.with(|c| c.cancel_contenido_form())
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

/// 主题详情：正文与该主题下的全部练习
#[component]
pub fn TemaDetalleModal() -> impl IntoView {
    let dashboard = use_dashboard();
    let state = dashboard.state();

    move || {
        state.with(|s| s.detalle.clone()).map(|detalle| {
            let contenido = detalle.contenido;
            view! {
                <div class="modal modal-open">
                    <div class="modal-box max-w-3xl">
                        <div class="flex items-start justify-between gap-2">
                            <h3 class="font-bold text-lg flex items-center gap-2">
                                <BookOpen attr:class="h-5 w-5 text-primary" />
                                {contenido.nombre_tema.clone()}
                            </h3>
                            <button
                                class="btn btn-ghost btn-sm btn-circle"
                                on:click=move |_| dashboard.with(|c| c.close_detalle())
                            >
                                <X attr:class="h-4 w-4" />
                            </button>
                        </div>
                        <p class="text-sm text-base-content/60">
                            {contenido.descripcion.clone().unwrap_or_default()}
                        </p>
                        <pre class="whitespace-pre-wrap bg-base-200 rounded-box p-4 mt-4 text-sm">
                            {contenido.texto_markdown.clone()}
                        </pre>

                        <h4 class="font-semibold mt-6 mb-2">"Ejercicios"</h4>
                        {if detalle.loading {
                            view! { <span class="loading loading-spinner loading-sm"></span> }.into_any()
                        } else if detalle.ejercicios.is_empty() {
                            view! {
                                <p class="text-sm text-base-content/60">"Este tema no tiene ejercicios"</p>
                            }
                            .into_any()
                        } else {
                            view! {
                                <ol class="list-decimal list-inside space-y-2">
                                    {detalle.ejercicios.into_iter().map(ejercicio_resumen).collect_view()}
                                </ol>
                            }
                            .into_any()
                        }}
                    </div>
                </div>
            }
        })
    }
}

fn ejercicio_resumen(ejercicio: Ejercicio) -> impl IntoView {
    view! {
        <li>
            <span>{ejercicio.enunciado}</span>
            <span class="badge badge-outline badge-sm ml-2">{ejercicio.tipo.label()}</span>
            <span class="badge badge-ghost badge-sm ml-1">{ejercicio.dificultad.as_str()}</span>
        </li>
    }
}
