//! Systemd unit-file generation
//!
//! Each installed service gets one unit under the system unit directory. The
//! unit orders itself after the docker daemon and after the units of the
//! service's resolved dependencies, and starts the container attached so
//! systemd supervises its lifetime.

/// The unit file name for a service
pub fn unit_file_name(service_name: &str) -> String {
    format!("docker-{}.service", service_name)
}

/// Render the unit text for a service and its ordered dependency names
pub fn render_unit(service_name: &str, dependencies: &[String]) -> String {
    let mut after = String::from("docker.service");
    for dep in dependencies {
        after.push(' ');
        after.push_str(&unit_file_name(dep));
    }

    format!(
        "[Unit]\n\
         Description=Container {name}\n\
         After={after}\n\
         Requires=docker.service\n\
         \n\
         [Service]\n\
         ExecStart=/usr/bin/docker start -a {name}\n\
         ExecStop=/usr/bin/docker stop {name}\n\
         Restart=always\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        name = service_name,
        after = after,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_file_name() {
        assert_eq!(unit_file_name("redis"), "docker-redis.service");
    }

    #[test]
    fn test_render_without_dependencies() {
        let unit = render_unit("redis", &[]);
        assert!(unit.contains("After=docker.service\n"));
        assert!(unit.contains("ExecStart=/usr/bin/docker start -a redis"));
        assert!(unit.contains("ExecStop=/usr/bin/docker stop redis"));
    }

    #[test]
    fn test_render_orders_after_dependency_units() {
        let unit = render_unit("api", &["db".to_string(), "cache".to_string()]);
        assert!(unit.contains("After=docker.service docker-db.service docker-cache.service\n"));
    }
}
