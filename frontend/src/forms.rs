//! 表单模型
//!
//! 每个表单一个结构体，用 `validator` 声明约束，并负责转换为请求载荷。

use eduweb_shared::protocol::{
    ContenidoCreate, ContenidoUpdate, EjercicioCreate, EjercicioUpdate, LoginCredentials,
    MateriaCreate, MateriaUpdate, UnidadCreate, UnidadUpdate, UserCreate,
};
use eduweb_shared::{Contenido, Dificultad, Ejercicio, Materia, Rol, TipoEjercicio, Unidad};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// 字段名 -> 第一条错误信息
pub type FieldErrors = BTreeMap<String, String>;

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Campo obligatorio".into()));
    }
    Ok(())
}

/// 把 `ValidationErrors` 展平为每个字段一条信息
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

/// 校验表单，失败时返回字段错误表
pub fn check<F: Validate>(form: &F) -> Result<(), FieldErrors> {
    form.validate().map_err(|e| field_errors(&e))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// =========================================================
// 认证
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Ingresa un email válido"))]
    pub username: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,
}

impl LoginForm {
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct RegisterForm {
    #[validate(custom(function = "non_blank"))]
    pub nombre: String,
    #[validate(email(message = "Ingresa un email válido"))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,
    pub rol: Rol,
}

impl RegisterForm {
    pub fn to_user(&self) -> UserCreate {
        UserCreate {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            nombre: self.nombre.trim().to_string(),
            rol: Some(self.rol),
        }
    }
}

// =========================================================
// 学科
// =========================================================

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MateriaForm {
    #[validate(custom(function = "non_blank"))]
    pub nombre: String,
    #[validate(range(min = 1, message = "El orden debe ser mayor que 0"))]
    pub orden: u32,
}

impl Default for MateriaForm {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            orden: 1,
        }
    }
}

impl MateriaForm {
    pub fn with_orden(orden: u32) -> Self {
        Self {
            orden,
            ..Default::default()
        }
    }

    pub fn to_create(&self, id: String) -> MateriaCreate {
        MateriaCreate {
            id,
            nombre: self.nombre.trim().to_string(),
            orden: Some(self.orden),
        }
    }

    pub fn to_update(&self) -> MateriaUpdate {
        MateriaUpdate {
            nombre: Some(self.nombre.trim().to_string()),
            orden: Some(self.orden),
        }
    }
}

impl From<&Materia> for MateriaForm {
    fn from(m: &Materia) -> Self {
        Self {
            nombre: m.nombre.clone(),
            orden: m.orden,
        }
    }
}

// =========================================================
// 单元
// =========================================================

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct UnidadForm {
    #[validate(range(min = 1, message = "El número debe ser mayor que 0"))]
    pub numero: u32,
    #[validate(custom(function = "non_blank"))]
    pub titulo: String,
    #[validate(custom(function = "non_blank"))]
    pub descripcion: String,
}

impl Default for UnidadForm {
    fn default() -> Self {
        Self {
            numero: 1,
            titulo: String::new(),
            descripcion: String::new(),
        }
    }
}

impl UnidadForm {
    pub fn with_numero(numero: u32) -> Self {
        Self {
            numero,
            ..Default::default()
        }
    }

    pub fn to_create(&self, id_materia: &str) -> UnidadCreate {
        UnidadCreate {
            id_materia: id_materia.to_string(),
            numero: self.numero,
            titulo: self.titulo.trim().to_string(),
            descripcion: self.descripcion.trim().to_string(),
        }
    }

    pub fn to_update(&self) -> UnidadUpdate {
        UnidadUpdate {
            titulo: Some(self.titulo.trim().to_string()),
            descripcion: Some(self.descripcion.trim().to_string()),
            numero: Some(self.numero),
        }
    }
}

impl From<&Unidad> for UnidadForm {
    fn from(u: &Unidad) -> Self {
        Self {
            numero: u.numero,
            titulo: u.titulo.clone(),
            descripcion: u.descripcion.clone(),
        }
    }
}

// =========================================================
// 内容
// =========================================================

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ContenidoForm {
    #[validate(custom(function = "non_blank"))]
    pub tema_id: String,
    #[validate(custom(function = "non_blank"))]
    pub nombre_tema: String,
    #[validate(custom(function = "non_blank"))]
    pub texto_markdown: String,
    #[validate(range(min = 1, message = "El número debe ser mayor que 0"))]
    pub numero: u32,
    pub descripcion: String,
}

impl Default for ContenidoForm {
    fn default() -> Self {
        Self {
            tema_id: String::new(),
            nombre_tema: String::new(),
            texto_markdown: String::new(),
            numero: 1,
            descripcion: String::new(),
        }
    }
}

impl ContenidoForm {
    /// 新建表单：客户端生成 `tema_<毫秒时间戳>`
    pub fn new_topic(tema_id: String, numero: u32) -> Self {
        Self {
            tema_id,
            numero,
            ..Default::default()
        }
    }

    pub fn to_create(&self, id_unidad: &str, id_materia: &str) -> ContenidoCreate {
        ContenidoCreate {
            tema_id: self.tema_id.trim().to_string(),
            nombre_tema: self.nombre_tema.trim().to_string(),
            texto_markdown: self.texto_markdown.clone(),
            id_unidad: id_unidad.to_string(),
            id_materia: id_materia.to_string(),
            numero: Some(self.numero),
            descripcion: optional(&self.descripcion),
        }
    }

    pub fn to_update(&self) -> ContenidoUpdate {
        ContenidoUpdate {
            nombre_tema: Some(self.nombre_tema.trim().to_string()),
            texto_markdown: Some(self.texto_markdown.clone()),
            descripcion: optional(&self.descripcion),
            numero: Some(self.numero),
        }
    }
}

impl From<&Contenido> for ContenidoForm {
    fn from(c: &Contenido) -> Self {
        Self {
            tema_id: c.key().to_string(),
            nombre_tema: c.nombre_tema.clone(),
            texto_markdown: c.texto_markdown.clone(),
            numero: c.numero,
            descripcion: c.descripcion.clone().unwrap_or_default(),
        }
    }
}

// =========================================================
// 练习
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct EjercicioForm {
    /// 为空时由调用方决定所属主题
    pub tema_id: String,
    #[validate(custom(function = "non_blank"))]
    pub enunciado: String,
    #[validate(custom(function = "non_blank"))]
    pub respuesta_correcta: String,
    pub tipo: TipoEjercicio,
    /// 逗号分隔的选项
    pub opciones: String,
    pub dificultad: Dificultad,
}

impl EjercicioForm {
    /// 拆分选项，去除空白项；全空时为 `None`
    pub fn opciones_list(&self) -> Option<Vec<String>> {
        let items: Vec<String> = self
            .opciones
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        (!items.is_empty()).then_some(items)
    }

    pub fn to_create(&self, tema_id: String) -> EjercicioCreate {
        EjercicioCreate {
            tema_id,
            enunciado: self.enunciado.trim().to_string(),
            respuesta_correcta: self.respuesta_correcta.trim().to_string(),
            tipo: Some(self.tipo),
            opciones: self.opciones_list(),
            dificultad: Some(self.dificultad),
        }
    }

    pub fn to_update(&self, tema_id: Option<String>) -> EjercicioUpdate {
        EjercicioUpdate {
            tema_id,
            enunciado: Some(self.enunciado.trim().to_string()),
            respuesta_correcta: Some(self.respuesta_correcta.trim().to_string()),
            tipo: Some(self.tipo),
            opciones: self.opciones_list(),
            dificultad: Some(self.dificultad),
        }
    }
}

impl From<&Ejercicio> for EjercicioForm {
    fn from(e: &Ejercicio) -> Self {
        Self {
            tema_id: e.tema_id.clone(),
            enunciado: e.enunciado.clone(),
            respuesta_correcta: e.respuesta_correcta.clone().unwrap_or_default(),
            tipo: e.tipo,
            opciones: e.opciones.as_ref().map(|o| o.join(", ")).unwrap_or_default(),
            dificultad: e.dificultad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_rules() {
        let form = LoginForm {
            username: "no-es-email".into(),
            password: "123".into(),
        };
        let errors = check(&form).unwrap_err();
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("password"));

        let form = LoginForm {
            username: "ana@example.com".into(),
            password: "123456".into(),
        };
        assert!(check(&form).is_ok());
    }

    #[test]
    fn test_empty_login_is_invalid() {
        let errors = check(&LoginForm::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_register_requires_nombre() {
        let form = RegisterForm {
            nombre: "   ".into(),
            email: "ana@example.com".into(),
            password: "123456".into(),
            rol: Rol::default(),
        };
        let errors = check(&form).unwrap_err();
        assert_eq!(errors.get("nombre").map(String::as_str), Some("Campo obligatorio"));
        assert_eq!(form.to_user().rol, Some(Rol::Alumno));
    }

    #[test]
    fn test_materia_orden_must_be_positive() {
        let form = MateriaForm {
            nombre: "Física".into(),
            orden: 0,
        };
        assert!(check(&form).unwrap_err().contains_key("orden"));
    }

    #[test]
    fn test_unidad_requires_text_fields() {
        let errors = check(&UnidadForm::default()).unwrap_err();
        assert!(errors.contains_key("titulo"));
        assert!(errors.contains_key("descripcion"));
        assert!(!errors.contains_key("numero"));
    }

    #[test]
    fn test_contenido_descripcion_is_optional() {
        let form = ContenidoForm {
            tema_id: "tema_1".into(),
            nombre_tema: "Suma".into(),
            texto_markdown: "# Suma".into(),
            numero: 2,
            descripcion: "  ".into(),
        };
        assert!(check(&form).is_ok());
        let create = form.to_create("u1", "m1");
        assert_eq!(create.descripcion, None);
        assert_eq!(create.numero, Some(2));
    }

    #[test]
    fn test_opciones_split_and_trim() {
        let mut form = EjercicioForm {
            opciones: " a, b ,, c ".into(),
            ..Default::default()
        };
        assert_eq!(
            form.opciones_list(),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );

        form.opciones = " , ".into();
        assert_eq!(form.opciones_list(), None);
    }

    #[test]
    fn test_ejercicio_defaults() {
        let form = EjercicioForm::default();
        assert_eq!(form.tipo, TipoEjercicio::MultipleChoice);
        assert_eq!(form.dificultad, Dificultad::Principiante);
        let errors = check(&form).unwrap_err();
        assert!(errors.contains_key("enunciado"));
        assert!(errors.contains_key("respuesta_correcta"));
    }

    #[test]
    fn test_ejercicio_form_from_entity_joins_options() {
        let e = Ejercicio {
            id: "e1".into(),
            tema_id: "t1".into(),
            enunciado: "¿?".into(),
            respuesta_correcta: Some("a".into()),
            tipo: TipoEjercicio::MultipleChoice,
            opciones: Some(vec!["a".into(), "b".into()]),
            dificultad: Dificultad::Intermedio,
            fecha_creacion: None,
        };
        let form = EjercicioForm::from(&e);
        assert_eq!(form.opciones, "a, b");
        assert_eq!(form.to_update(None).opciones, e.opciones);
    }
}
