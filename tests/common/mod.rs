//! On-disk fixture shared by the loading and CLI tests: two operators, a small curve, one
//! material, a roster, an inventory and an event file.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const EXUSIAI: &str = r#"{
  "name": "Exusiai",
  "stars": 6,
  "elite": [
    {"level": 1, "resources": [{"name": "LMD", "quantity": 30000}, {"name": "Sniper Chip", "quantity": 5}]},
    {"level": 2, "resources": [{"name": "LMD", "quantity": 180000}, {"name": "Sniper Dualchip", "quantity": 4}]}
  ],
  "skills": {
    "upgrade": [
      {"level": 1, "resources": []},
      {"level": 2, "resources": [{"name": "Skill Summary - 1", "quantity": 5}]},
      {"level": 3, "resources": [{"name": "Skill Summary - 2", "quantity": 6}, {"name": "Orirock", "quantity": 3}]}
    ],
    "mastery": [
      {"skill": 1, "upgrade": [
        {"level": 1, "resources": [{"name": "Skill Summary - 3", "quantity": 8}]},
        {"level": 2, "resources": [{"name": "Skill Summary - 3", "quantity": 12}, {"name": "Orirock", "quantity": 4}]},
        {"level": 3, "resources": [{"name": "Skill Summary - 3", "quantity": 15}]}
      ]}
    ]
  }
}"#;

pub const KROOS: &str = r#"{
  "name": "Kroos",
  "stars": 3,
  "elite": [
    {"level": 1, "resources": [{"name": "LMD", "quantity": 10000}, {"name": "Sniper Chip", "quantity": 3}]},
    {"level": 2, "resources": {}}
  ],
  "skills": {
    "upgrade": [
      {"level": 1, "resources": []},
      {"level": 2, "resources": [{"name": "Skill Summary - 1", "quantity": 2}]}
    ],
    "mastery": []
  }
}"#;

pub const ORIROCK: &str =
    r#"{"name": "Orirock", "tier": 1, "droppable": true, "lmd": 0, "recipe": []}"#;

pub const CURVE: &str = "rank,elite,level,currency_cost,experience_cost
3,0,1,0,0
3,0,2,50,500
3,0,3,50,500
3,1,1,500,2000
3,1,2,100,1000
3,1,3,100,1500
6,0,1,0,0
6,0,2,100,1000
6,0,3,200,2000
6,1,1,1000,5000
6,1,2,300,3000
6,1,3,400,4000
6,2,1,2000,10000
6,2,2,500,5000
6,2,3,600,6000
";

pub const ROSTER: &str = "name;stars;elite_level;level;skill_level;s1_mastery;s2_mastery;s3_mastery
Exusiai;6;1;2;3;2;;
kroos;3;1;3;2;;;
";

pub const INVENTORY: &str = "Orirock,100\nSkill Summary - 3,10\n";

pub const EVENTS: &str = "event,done,Skill Summary - 3,Sniper Dualchip
Side Story,False,2,1
Old Event,True,50,50
";

pub fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("arkledger-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

pub fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("fixture dir should be created");
    }
    fs::write(&path, content).expect("fixture should be written");
    path
}

/// Lay the fixture out the way the tool expects it relative to its working directory:
/// `data/{operators,resources,explmd.csv}` and `files/*.csv`.
pub fn write_fixture(root: &Path) {
    write(root, "data/operators/6stars/Exusiai.json", EXUSIAI);
    write(root, "data/operators/3stars/Kroos.json", KROOS);
    write(root, "data/resources/t1/Orirock.json", ORIROCK);
    write(root, "data/explmd.csv", CURVE);
    write(root, "files/user_operators.csv", ROSTER);
    write(root, "files/user_resources.csv", INVENTORY);
    write(root, "files/event_resources.csv", EVENTS);
}
