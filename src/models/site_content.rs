use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Editable site content document. Loaded copies are merged with the shipped
/// defaults so that fields added after a deployment's last edit are
/// backfilled instead of coming up empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteContent {
    pub header: HeaderContent,
    pub hero: HeroContent,
    pub services: ServicesContent,
    pub booking: BookingContent,
    pub request_form: RequestFormContent,
    pub contacts: ContactsContent,
    pub media: MediaContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderContent {
    pub logo_text: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesContent {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: u32,
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingContent {
    pub title: String,
    pub subtitle: String,
    pub submit_text: String,
    pub need_auth_text: String,
    pub benefits: Vec<String>,
    /// Deployment override of the slot grid; empty means "use the
    /// configured catalog".
    pub time_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFormContent {
    pub title: String,
    pub subtitle: String,
    pub submitted_text: String,
    pub send_error_text: String,
    pub car_brands: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsContent {
    pub title: String,
    pub address_text: String,
    pub phones: Vec<String>,
    pub email: String,
    pub work_hours_lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaContent {
    pub photos: Vec<String>,
    pub video_url: String,
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            header: HeaderContent {
                logo_text: "Автопапа".to_string(),
                phone: "+7 (999) 123-45-67".to_string(),
            },
            hero: HeroContent {
                title: "Автосервис Автопапа".to_string(),
                subtitle: "Ремонт и обслуживание автомобилей".to_string(),
                description: "Диагностика, ремонт и ТО любой сложности в Санкт-Петербурге"
                    .to_string(),
                cta_text: "Записаться".to_string(),
            },
            services: ServicesContent {
                title: "Наши услуги".to_string(),
                subtitle: "Полный спектр работ по ремонту и обслуживанию".to_string(),
                items: vec![
                    ServiceItem {
                        id: 1,
                        icon: "🔧".to_string(),
                        title: "Техническое обслуживание".to_string(),
                        description: "Регулярное ТО, замена масла, фильтров и расходников"
                            .to_string(),
                    },
                    ServiceItem {
                        id: 2,
                        icon: "🚙".to_string(),
                        title: "Ремонт кузова".to_string(),
                        description: "Кузовной ремонт, покраска, восстановление геометрии"
                            .to_string(),
                    },
                    ServiceItem {
                        id: 3,
                        icon: "⚙️".to_string(),
                        title: "Ремонт двигателя".to_string(),
                        description: "Диагностика и ремонт двигателя любой сложности".to_string(),
                    },
                    ServiceItem {
                        id: 4,
                        icon: "💻".to_string(),
                        title: "Компьютерная диагностика".to_string(),
                        description: "Полная диагностика всех систем автомобиля".to_string(),
                    },
                ],
            },
            booking: BookingContent {
                title: "Онлайн-запись".to_string(),
                subtitle: "Выберите удобные дату и время".to_string(),
                submit_text: "Записаться".to_string(),
                need_auth_text: "Войдите, чтобы записаться на сервис".to_string(),
                benefits: vec![
                    "Подтверждение в течение часа".to_string(),
                    "Бесплатная диагностика при ремонте".to_string(),
                    "Гарантия на все работы".to_string(),
                ],
                time_slots: vec![],
            },
            request_form: RequestFormContent {
                title: "Оставить заявку".to_string(),
                subtitle: "Заполните форму, и мы свяжемся с вами".to_string(),
                submitted_text: "Спасибо! Ваша заявка отправлена.".to_string(),
                send_error_text: "Не удалось отправить заявку, попробуйте позже".to_string(),
                car_brands: vec![
                    "Лада".to_string(),
                    "Hyundai".to_string(),
                    "KIA".to_string(),
                    "BMW".to_string(),
                    "Mercedes-Benz".to_string(),
                    "Toyota".to_string(),
                    "Volkswagen".to_string(),
                    "Другое".to_string(),
                ],
            },
            contacts: ContactsContent {
                title: "Контакты".to_string(),
                address_text: "Санкт-Петербург, Московский пр., 52".to_string(),
                phones: vec![
                    "+7 (999) 123-45-67".to_string(),
                    "+7 (999) 876-54-32".to_string(),
                ],
                email: "info@avtopapa.ru".to_string(),
                work_hours_lines: vec![
                    "Пн–Сб: 09:00–19:00".to_string(),
                    "Вс: 10:00–18:00".to_string(),
                ],
            },
            media: MediaContent {
                photos: vec![],
                video_url: String::new(),
            },
        }
    }
}

impl SiteContent {
    /// Rebuild a full document from a possibly partial or stale stored value.
    /// Missing fields are backfilled from defaults; arrays are replaced
    /// wholesale when present.
    pub fn from_stored(stored: &Value) -> Self {
        let defaults =
            serde_json::to_value(Self::default()).unwrap_or(Value::Object(Default::default()));
        let merged = merge_with_defaults(&defaults, stored);
        serde_json::from_value(merged).unwrap_or_default()
    }
}

/// Recursive field-by-field merge. Objects merge per key, arrays are taken
/// from stored data when present, scalars keep the stored value unless it
/// is absent.
pub fn merge_with_defaults(defaults: &Value, stored: &Value) -> Value {
    match defaults {
        Value::Array(_) => {
            if stored.is_array() {
                stored.clone()
            } else {
                defaults.clone()
            }
        }
        Value::Object(default_map) => {
            let stored_map = stored.as_object();
            let mut out = serde_json::Map::with_capacity(default_map.len());
            for (key, default_value) in default_map {
                let stored_value = stored_map.and_then(|m| m.get(key)).unwrap_or(&Value::Null);
                out.insert(key.clone(), merge_with_defaults(default_value, stored_value));
            }
            Value::Object(out)
        }
        _ => {
            if stored.is_null() {
                defaults.clone()
            } else {
                stored.clone()
            }
        }
    }
}
