/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use clap::Parser;
use lab_report::app::{self, Action, ActionSet};
use lab_report::ControllerClient;
use log::error;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "lab_report",
    about = "Report on simulation-controller operational state and usage"
)]
struct Opt {
    /// Controller host or IP
    #[arg(long)]
    server: String,

    /// API username
    #[arg(long)]
    username: String,

    /// API password
    #[arg(long, env = "LAB_REPORT_PASSWORD", hide_env_values = true)]
    password: String,

    /// Export labs, nodes, and system data to JSON files
    #[arg(long)]
    export: bool,

    /// Actions to perform: 'health' for compute health, 'labs' for topology
    /// labs, 'all' for everything
    #[arg(long, num_args = 1.., default_value = "all", value_parser = parse_action)]
    actions: Vec<Action>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn parse_action(s: &str) -> Result<Action, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let opt = Opt::parse();

    let mut client = match ControllerClient::new(&opt.server, Duration::from_secs(opt.timeout)) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    let actions = ActionSet::from_actions(&opt.actions);
    match app::run(
        &mut client,
        &opt.username,
        &opt.password,
        actions,
        opt.export,
    )
    .await
    {
        Ok(status) if status.degraded => {
            error!("one or more fetches failed; reported data is incomplete");
            ExitCode::from(2)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}
