use super::DashboardController;
use crate::forms::{ContenidoForm, EjercicioForm, MateriaForm, UnidadForm, check};
use crate::web::http::HttpClient;
use crate::web::storage::KeyValueStore;
use eduweb_shared::date::Timestamp;
use eduweb_shared::{Contenido, Ejercicio, Materia, Unidad};
use leptos::logging::error;
use leptos::prelude::*;

const MISSING_ID: &str = "No se puede actualizar: falta identificador";

impl<C: HttpClient, S: KeyValueStore> DashboardController<C, S> {
    // =========================================================
    // 学科
    // =========================================================

    pub fn show_create_materia(&self) {
        self.state.update(|s| {
            let orden = s.materias.len() as u32 + 1;
            s.materia_form.open_create(MateriaForm::with_orden(orden));
        });
    }

    pub fn edit_materia(&self, materia: Materia) {
        self.state.update(|s| {
            let values = MateriaForm::from(&materia);
            s.materia_form.open_edit(materia, values);
        });
    }

    pub fn update_materia_form(&self, f: impl FnOnce(&mut MateriaForm)) {
        self.state.update(|s| f(&mut s.materia_form.values));
    }

    pub fn cancel_materia_form(&self) {
        self.state.update(|s| s.materia_form.close());
    }

    pub async fn save_materia(&self) {
        let (values, editing) = self.read(|s| {
            (
                s.materia_form.values.clone(),
                s.materia_form.editing.clone(),
            )
        });
        if let Err(errors) = check(&values) {
            self.state.update(|s| s.materia_form.errors = errors);
            return;
        }

        let (result, verb) = match &editing {
            Some(m) => (
                self.api.update_materia(&m.id, &values.to_update()).await,
                "actualizada",
            ),
            None => (
                self.api
                    .create_materia(&values.to_create(Timestamp::now().to_string()))
                    .await,
                "creada",
            ),
        };

        match result {
            Ok(_) => {
                self.notify(format!("Materia {} exitosamente", verb), false);
                self.state.update(|s| s.materia_form.close());
                self.load_materias().await;
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op("dashboard.save_materia"));
                let action = if editing.is_some() { "actualizar" } else { "crear" };
                self.notify(format!("Error al {} la materia", action), true);
            }
        }
    }

    pub async fn delete_materia(&self, materia: Materia) {
        let prompt = format!(
            "¿Estás seguro de que quieres eliminar la materia \"{}\"?",
            materia.nombre
        );
        if !(self.confirm)(&prompt) {
            return;
        }

        match self.api.delete_materia(&materia.id).await {
            Ok(()) => {
                self.notify("Materia eliminada exitosamente", false);
                self.state.update(|s| {
                    if s.is_materia_selected(&materia.id) {
                        s.clear_below_materia();
                        s.selected_materia = None;
                    }
                });
                self.load_materias().await;
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op_with("dashboard.delete_materia", &materia.id));
                self.notify("Error al eliminar la materia", true);
            }
        }
    }

    // =========================================================
    // 单元
    // =========================================================

    pub fn show_create_unidad(&self) {
        if self.read(|s| s.selected_materia.is_none()) {
            self.notify("Selecciona una materia primero", true);
            return;
        }
        self.state.update(|s| {
            let numero = s.unidades.len() as u32 + 1;
            s.unidad_form.open_create(UnidadForm::with_numero(numero));
        });
    }

    pub fn edit_unidad(&self, unidad: Unidad) {
        self.state.update(|s| {
            let values = UnidadForm::from(&unidad);
            s.unidad_form.open_edit(unidad, values);
        });
    }

    pub fn update_unidad_form(&self, f: impl FnOnce(&mut UnidadForm)) {
        self.state.update(|s| f(&mut s.unidad_form.values));
    }

    pub fn cancel_unidad_form(&self) {
        self.state.update(|s| s.unidad_form.close());
    }

    pub async fn save_unidad(&self) {
        let (values, editing, materia, generation) = self.read(|s| {
            (
                s.unidad_form.values.clone(),
                s.unidad_form.editing.clone(),
                s.selected_materia.clone(),
                s.materia_generation,
            )
        });
        let Some(materia) = materia else {
            self.notify("Selecciona una materia primero", true);
            return;
        };
        if let Err(errors) = check(&values) {
            self.state.update(|s| s.unidad_form.errors = errors);
            return;
        }

        let (result, verb) = match &editing {
            Some(unidad) => {
                let Some(id) = unidad.id() else {
                    self.notify(MISSING_ID, true);
                    return;
                };
                (
                    self.api.update_unidad(id, &values.to_update()).await,
                    "actualizada",
                )
            }
            None => (
                self.api.create_unidad(&values.to_create(&materia.id)).await,
                "creada",
            ),
        };

        match result {
            Ok(_) => {
                self.notify(format!("Unidad {} exitosamente", verb), false);
                self.state.update(|s| s.unidad_form.close());
                // 保存期间切换了学科时不再按旧学科重载
                if self.materia_is_current(generation) {
                    self.load_unidades(&materia.id).await;
                }
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op("dashboard.save_unidad"));
                let action = if editing.is_some() { "actualizar" } else { "crear" };
                self.notify(format!("Error al {} la unidad", action), true);
            }
        }
    }

    pub async fn delete_unidad(&self, unidad: Unidad) {
        let prompt = format!(
            "¿Estás seguro de que quieres eliminar la unidad \"{}\"?",
            unidad.titulo
        );
        if !(self.confirm)(&prompt) {
            return;
        }
        let Some(id) = unidad.id() else {
            self.notify("No se puede eliminar: falta identificador", true);
            return;
        };

        match self.api.delete_unidad(id).await {
            Ok(()) => {
                self.notify("Unidad eliminada exitosamente", false);
                let materia_id = self.read(|s| s.selected_materia.as_ref().map(|m| m.id.clone()));
                self.state.update(|s| {
                    if s.is_unidad_selected(&unidad) {
                        s.clear_below_unidad();
                        s.selected_unidad = None;
                    }
                });
                if let Some(materia_id) = materia_id {
                    self.load_unidades(&materia_id).await;
                }
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op_with("dashboard.delete_unidad", id));
                self.notify("Error al eliminar la unidad", true);
            }
        }
    }

    // =========================================================
    // 内容
    // =========================================================

    pub fn show_create_contenido(&self) {
        if self.read(|s| s.selected_unidad.is_none()) {
            self.notify("Selecciona una unidad primero", true);
            return;
        }
        self.state.update(|s| {
            let numero = s.contenidos.len() as u32 + 1;
            let tema_id = format!("tema_{}", Timestamp::now());
            s.contenido_form
                .open_create(ContenidoForm::new_topic(tema_id, numero));
        });
    }

    pub fn edit_contenido(&self, contenido: Contenido) {
        self.state.update(|s| {
            let values = ContenidoForm::from(&contenido);
            s.contenido_form.open_edit(contenido, values);
        });
    }

    pub fn update_contenido_form(&self, f: impl FnOnce(&mut ContenidoForm)) {
        self.state.update(|s| f(&mut s.contenido_form.values));
    }

    pub fn cancel_contenido_form(&self) {
        self.state.update(|s| s.contenido_form.close());
    }

    pub async fn save_contenido(&self) {
        let (values, editing, materia, unidad_key, generation) = self.read(|s| {
            (
                s.contenido_form.values.clone(),
                s.contenido_form.editing.clone(),
                s.selected_materia.clone(),
                s.selected_unidad.as_ref().and_then(Unidad::resolve_key),
                s.unidad_generation,
            )
        });
        let (Some(materia), Some(unidad_key)) = (materia, unidad_key) else {
            self.notify("Selecciona una unidad primero", true);
            return;
        };
        if let Err(errors) = check(&values) {
            self.state.update(|s| s.contenido_form.errors = errors);
            return;
        }

        let (result, verb) = match &editing {
            Some(contenido) => (
                self.api
                    .update_contenido(contenido.key(), &values.to_update())
                    .await,
                "actualizado",
            ),
            None => (
                self.api
                    .create_contenido(&values.to_create(&unidad_key, &materia.id))
                    .await,
                "creado",
            ),
        };

        match result {
            Ok(_) => {
                self.notify(format!("Contenido {} exitosamente", verb), false);
                self.state.update(|s| s.contenido_form.close());
                if self.unidad_is_current(generation) {
                    self.load_contenidos(&unidad_key).await;
                }
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op("dashboard.save_contenido"));
                let action = if editing.is_some() { "actualizar" } else { "crear" };
                self.notify(format!("Error al {} el contenido", action), true);
            }
        }
    }

    pub async fn delete_contenido(&self, contenido: Contenido) {
        let prompt = format!(
            "¿Estás seguro de que quieres eliminar el contenido \"{}\"?",
            contenido.nombre_tema
        );
        if !(self.confirm)(&prompt) {
            return;
        }

        let tema_id = contenido.key().to_string();
        match self.api.delete_contenido(&tema_id).await {
            Ok(()) => {
                self.notify("Contenido eliminado exitosamente", false);
                let unidad_key = self.read(|s| {
                    s.selected_unidad.as_ref().and_then(Unidad::resolve_key)
                });
                self.state.update(|s| {
                    if s.detalle.as_ref().is_some_and(|d| d.contenido.key() == tema_id) {
                        s.detalle = None;
                    }
                });
                if let Some(unidad_key) = unidad_key {
                    self.load_contenidos(&unidad_key).await;
                }
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op_with("dashboard.delete_contenido", &tema_id));
                self.notify("Error al eliminar el contenido", true);
            }
        }
    }

    // =========================================================
    // 练习
    // =========================================================

    pub fn show_create_ejercicio(&self) {
        let ready = self.read(|s| s.selected_unidad.is_some() && !s.contenidos.is_empty());
        if !ready {
            self.notify(
                "Necesitas tener al menos un contenido en la unidad para crear ejercicios",
                true,
            );
            return;
        }
        self.state
            .update(|s| s.ejercicio_form.open_create(EjercicioForm::default()));
    }

    pub fn edit_ejercicio(&self, ejercicio: Ejercicio) {
        self.state.update(|s| {
            let values = EjercicioForm::from(&ejercicio);
            s.ejercicio_form.open_edit(ejercicio, values);
        });
    }

    pub fn update_ejercicio_form(&self, f: impl FnOnce(&mut EjercicioForm)) {
        self.state.update(|s| f(&mut s.ejercicio_form.values));
    }

    pub fn cancel_ejercicio_form(&self) {
        self.state.update(|s| s.ejercicio_form.close());
    }

    /// 所属主题：表单选择 → 编辑中记录 → 当前单元的第一个内容
    pub async fn save_ejercicio(&self) {
        let (values, editing, tema_id, generation) = self.read(|s| {
            let values = s.ejercicio_form.values.clone();
            let editing = s.ejercicio_form.editing.clone();
            let tema_id = Some(values.tema_id.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .or_else(|| editing.as_ref().map(|e| e.tema_id.clone()))
                .or_else(|| s.contenidos.first().map(|c| c.key().to_string()))
                .filter(|t| !t.is_empty());
            (values, editing, tema_id, s.unidad_generation)
        });
        if let Err(errors) = check(&values) {
            self.state.update(|s| s.ejercicio_form.errors = errors);
            return;
        }

        let (result, verb) = match &editing {
            Some(ejercicio) => (
                self.api
                    .update_ejercicio(&ejercicio.id, &values.to_update(tema_id.clone()))
                    .await,
                "actualizado",
            ),
            None => {
                let Some(tema_id) = tema_id else {
                    self.notify("No se puede crear el ejercicio: falta tema ID", true);
                    return;
                };
                (
                    self.api.create_ejercicio(&values.to_create(tema_id)).await,
                    "creado",
                )
            }
        };

        match result {
            Ok(_) => {
                self.notify(format!("Ejercicio {} exitosamente", verb), false);
                self.state.update(|s| s.ejercicio_form.close());
                if self.unidad_is_current(generation) {
                    self.load_ejercicios().await;
                }
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op("dashboard.save_ejercicio"));
                let action = if editing.is_some() { "actualizar" } else { "crear" };
                self.notify(format!("Error al {} el ejercicio", action), true);
            }
        }
    }

    pub async fn delete_ejercicio(&self, ejercicio: Ejercicio) {
        if !(self.confirm)("¿Estás seguro de que quieres eliminar este ejercicio?") {
            return;
        }

        match self.api.delete_ejercicio(&ejercicio.id).await {
            Ok(()) => {
                self.notify("Ejercicio eliminado exitosamente", false);
                self.load_ejercicios().await;
            }
            Err(e) => {
                error!("[Dashboard] {}", e.in_op_with("dashboard.delete_ejercicio", &ejercicio.id));
                self.notify("Error al eliminar el ejercicio", true);
            }
        }
    }
}
