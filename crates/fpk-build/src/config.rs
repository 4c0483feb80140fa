use fpk_core::Variables;
use serde::Serialize;

/// `run-as` mode written into the default privilege config.
pub const RUN_AS_PACKAGE: &str = "package";

/// Directory of the docker project, relative to the `app` directory.
pub const DOCKER_PROJECT_PATH: &str = "docker";

/// `config/privilege`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivilegeConfig {
    pub defaults: PrivilegeDefaults,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub groupname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivilegeDefaults {
    #[serde(rename = "run-as")]
    pub run_as: String,
}

/// `config/resource`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceConfig {
    #[serde(rename = "docker-project")]
    pub docker_project: DockerProjectConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DockerProjectConfig {
    pub projects: Vec<DockerProject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DockerProject {
    pub name: String,
    pub path: String,
}

impl PrivilegeConfig {
    pub fn for_service(vars: &Variables) -> Self {
        Self {
            defaults: PrivilegeDefaults {
                run_as: RUN_AS_PACKAGE.to_owned(),
            },
            username: vars.service_name.clone(),
            groupname: vars.service_name.clone(),
        }
    }
}

impl ResourceConfig {
    pub fn for_service(vars: &Variables) -> Self {
        Self {
            docker_project: DockerProjectConfig {
                projects: vec![DockerProject {
                    name: vars.service_name.clone(),
                    path: DOCKER_PROJECT_PATH.to_owned(),
                }],
            },
        }
    }
}

pub fn render_privilege(vars: &Variables) -> Result<String, serde_json::Error> {
    to_indented_json(&PrivilegeConfig::for_service(vars))
}

pub fn render_resource(vars: &Variables) -> Result<String, serde_json::Error> {
    to_indented_json(&ResourceConfig::for_service(vars))
}

/// JSON with a 4-space indent and a trailing newline.
pub fn to_indented_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8_lossy(&buf).into_owned();
    json.push('\n');
    Ok(json)
}
