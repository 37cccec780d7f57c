// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn at_arg() -> Arg {
    Arg::new("at")
        .long("at")
        .help("Reference instant, YYYY-MM-DD[ HH:MM[:SS]] (default: now)")
}

fn timeframe_arg() -> Arg {
    Arg::new("timeframe")
        .long("timeframe")
        .short('t')
        .default_value("month")
        .help("day | week | month | year")
}

pub fn build_cli() -> Command {
    Command::new("worthit")
        .version(crate_version!())
        .about("Track spending and see what it costs in hours of work")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Income and expense transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Record as income instead of an expense"),
                        )
                        .arg(Arg::new("date").long("date").help("Default: now"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("expenses"),
                        )
                        .arg(
                            Arg::new("expenses")
                                .long("expenses")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("wage")
                .about("Hourly wage history")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("hourly").long("hourly").required(true))
                        .arg(Arg::new("from").long("from").help("Default: now"))
                        .arg(
                            Arg::new("until")
                                .long("until")
                                .help("Record a closed past rate instead of a new current one"),
                        ),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("budget")
                .about("Per-category budgets (at most five)")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("rm").arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("status").arg(timeframe_arg()).arg(at_arg()),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Spending summaries")
                .subcommand(json_flags(
                    Command::new("series").arg(timeframe_arg()).arg(at_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("categories").arg(timeframe_arg()).arg(at_arg()),
                ))
                .subcommand(
                    Command::new("hours")
                        .about("Express an amount in hours of work")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(at_arg()),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Replicate local changes to the remote store")
                .subcommand(Command::new("push"))
                .subcommand(json_flags(Command::new("status"))),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(json_flags(Command::new("show"))),
        )
        .subcommand(Command::new("doctor").about("Check the data for inconsistencies"))
}
