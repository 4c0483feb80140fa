use crate::compose::ComposeFile;

/// Substitution values derived from the first service of a compose file.
///
/// Computed once per build and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    /// Name of the service that sorts first
    pub service_name: String,
    /// That service's `container_name`, falling back to `service_name`
    pub container_name: String,
    /// Host port of the service's first port mapping
    pub first_port: String,
    /// Organization segment of the image reference
    pub image_org: String,
    /// Image name without registry, organization, or tag
    pub image_name: String,
}

impl Variables {
    /// Extract variables from the service whose name sorts first.
    ///
    /// Selection is by byte-wise name order, not declaration order. With no
    /// services every field is empty.
    pub fn extract(compose: &ComposeFile) -> Self {
        let Some((service_name, service)) = compose.services.iter().next() else {
            return Self::default();
        };

        let container_name = service
            .container_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(service_name.as_str())
            .to_owned();

        let first_port = service
            .ports
            .first()
            .map(|mapping| mapping.host_port())
            .unwrap_or_default();

        let (image_org, image_name) = extract_image_info(service.image.as_deref().unwrap_or(""));

        let vars = Self {
            service_name: service_name.clone(),
            container_name,
            first_port,
            image_org,
            image_name,
        };
        tracing::debug!(
            service = %vars.service_name,
            container = %vars.container_name,
            port = %vars.first_port,
            image_org = %vars.image_org,
            image_name = %vars.image_name,
            "variables extracted"
        );
        vars
    }
}

/// Host port of a short-syntax port mapping.
///
/// Accepts `"3000"`, `"3000:8080"`, and `"0.0.0.0:3000:8080"`, each with an
/// optional `/proto` suffix. Any other shape yields an empty string. The
/// three-part form always takes the middle token, so a bare IPv6 bind
/// address is not supported.
pub fn extract_host_port(mapping: &str) -> String {
    let mapping = match mapping.rfind('/') {
        Some(idx) => &mapping[..idx],
        None => mapping,
    };

    let parts: Vec<&str> = mapping.split(':').collect();
    match parts.as_slice() {
        [port] | [port, _] | [_, port, _] => (*port).to_owned(),
        _ => String::new(),
    }
}

/// Organization and name of an image reference.
///
/// - `"lobehub/lobe-chat:latest"` → `("lobehub", "lobe-chat")`
/// - `"alpine:latest"` → `("alpine", "alpine")`
/// - `"registry.example.com/org/image:tag"` → `("org", "image")`
///
/// A `:` followed by a `/` is a registry port and is kept.
pub fn extract_image_info(image: &str) -> (String, String) {
    if image.is_empty() {
        return (String::new(), String::new());
    }

    let image = match image.rfind(':') {
        Some(idx) if !image[idx..].contains('/') => &image[..idx],
        _ => image,
    };

    let parts: Vec<&str> = image.split('/').collect();
    match parts.as_slice() {
        [name] => ((*name).to_owned(), (*name).to_owned()),
        [.., org, name] => ((*org).to_owned(), (*name).to_owned()),
        [] => (String::new(), String::new()),
    }
}
