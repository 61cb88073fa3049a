use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let project = Self { root };
        // pin the config so a developer's own files don't leak into tests
        project.write("deployflow.yaml", "provider: alicloud\n");
        project
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn config(&self) -> PathBuf {
        self.root.path().join("deployflow.yaml")
    }

    #[allow(dead_code)]
    pub fn write_inventory(&self) -> PathBuf {
        self.write(
            "inventory.yaml",
            r#"
- serverGroupName: app-v002
  cluster: app
  credentials: prod
  region: cn-hangzhou
  capacity: { min: 2, max: 6, desired: 3 }
"#,
        )
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}
