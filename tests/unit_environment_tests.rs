//! # Environment Module Unit Tests / Environment 模块单元测试
//!
//! Tests for the per-CPU JVM flags and how they are appended to the
//! inherited environment.
//!
//! 测试每个 CPU 的 JVM 标志以及它们如何追加到继承的环境变量中。

use std::path::PathBuf;
use sweep_runner::config::{RunOverrides, SweepConfig, SweepPlan};
use sweep_runner::core::environment::{GRADLE_OPTS, InheritedEnv, JAVA_TOOL_OPTIONS, JvmProfile};

const DEFAULT_TOOL_OPTIONS_CPU_4: &str = "-Xms4g -Xmx4g -XX:+UseG1GC -XX:ParallelGCThreads=1 \
     -XX:ConcGCThreads=1 -XX:+AlwaysPreTouch -Dbfs.threads=4 -Dfile.encoding=UTF-8";

#[cfg(test)]
mod jvm_profile_tests {
    use super::*;

    #[test]
    fn test_cpu_property() {
        assert_eq!(JvmProfile::default().cpu_property(6), "-Dbfs.threads=6");
    }

    #[test]
    fn test_tool_options_order() {
        assert_eq!(JvmProfile::default().tool_options(4), DEFAULT_TOOL_OPTIONS_CPU_4);
    }

    #[test]
    fn test_custom_profile() {
        let profile = JvmProfile {
            thread_property: "graph.threads".to_string(),
            heap: "512m".to_string(),
            gc_flags: vec![],
            extra_flags: vec![],
        };
        assert_eq!(profile.tool_options(2), "-Xms512m -Xmx512m -Dgraph.threads=2");
    }
}

#[cfg(test)]
mod inherited_env_tests {
    use super::*;

    #[test]
    fn test_empty_inherited_environment() {
        let env = InheritedEnv::default().for_cpu(4, &JvmProfile::default());
        assert_eq!(
            env,
            vec![
                (
                    JAVA_TOOL_OPTIONS.to_string(),
                    DEFAULT_TOOL_OPTIONS_CPU_4.to_string()
                ),
                (GRADLE_OPTS.to_string(), "-Dbfs.threads=4".to_string()),
            ]
        );
    }

    #[test]
    fn test_inherited_values_are_appended_to() {
        let inherited = InheritedEnv {
            java_tool_options: Some("-Da=1".to_string()),
            gradle_opts: Some("  -Dorg.gradle.jvmargs=-Xmx1g ".to_string()),
        };
        let env = inherited.for_cpu(4, &JvmProfile::default());
        assert_eq!(env[0].1, format!("-Da=1 {DEFAULT_TOOL_OPTIONS_CPU_4}"));
        assert_eq!(env[1].1, "-Dorg.gradle.jvmargs=-Xmx1g  -Dbfs.threads=4");
    }

    #[test]
    fn test_each_cpu_starts_from_the_snapshot() {
        let inherited = InheritedEnv {
            java_tool_options: None,
            gradle_opts: Some("-Dbase=1".to_string()),
        };
        let profile = JvmProfile::default();
        let first = inherited.for_cpu(1, &profile);
        let second = inherited.for_cpu(2, &profile);
        assert_eq!(first[1].1, "-Dbase=1 -Dbfs.threads=1");
        assert_eq!(second[1].1, "-Dbase=1 -Dbfs.threads=2");
    }
}

#[cfg(test)]
mod invocation_tests {
    use super::*;

    #[test]
    fn test_invocation_for_cpu() {
        let plan = SweepPlan::resolve(
            PathBuf::from("/project"),
            SweepConfig {
                wrapper: Some("gradlew".to_string()),
                ..SweepConfig::default()
            },
            RunOverrides::default(),
        )
        .unwrap();

        let invocation = plan.invocation_for(2, &InheritedEnv::default());
        assert_eq!(invocation.cpu, 2);
        assert_eq!(invocation.program, PathBuf::from("/project/gradlew"));
        assert_eq!(invocation.working_dir, PathBuf::from("/project"));
        assert_eq!(invocation.env_value(GRADLE_OPTS), Some("-Dbfs.threads=2"));
        assert_eq!(invocation.env_value("PATH"), None);
        assert_eq!(
            invocation.display_command(),
            "/project/gradlew clean test --no-daemon --tests org.itmo.BFSTest"
        );
    }
}
