/// A well-known Service Type ID and its USPS description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceType {
    pub id: &'static str,
    pub label: &'static str,
}

pub const SERVICE_TYPES: &[ServiceType] = &[
    ServiceType { id: "300", label: "First-Class Mail - No Services" },
    ServiceType { id: "301", label: "First-Class Mail - Manual Correction" },
    ServiceType { id: "310", label: "First-Class Mail - Electronic Service" },
    ServiceType { id: "311", label: "First-Class Mail - Auto-Correction" },
    ServiceType { id: "261", label: "Marketing Mail - No Services" },
    ServiceType { id: "271", label: "Marketing Mail - Manual Correction" },
    ServiceType { id: "080", label: "Priority Mail - No Services" },
    ServiceType { id: "081", label: "Priority Mail - Manual Correction" },
    ServiceType { id: "700", label: "Periodicals - No Services" },
    ServiceType { id: "701", label: "Periodicals - Manual Correction" },
    ServiceType { id: "000", label: "Custom / Other" },
];

/// Looks up the description of a Service Type ID. Informational only; the encoder accepts any
/// value.
pub fn service_type_label(id: &str) -> Option<&'static str> {
    SERVICE_TYPES
        .iter()
        .find(|service_type| service_type.id == id)
        .map(|service_type| service_type.label)
}
