// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("Calendar day YYYY-MM-DD (defaults to today)")
}

pub fn build_cli() -> Command {
    Command::new("tillbook")
        .version(clap::crate_version!())
        .about("Small-business ledger with stock tracking, alerts and cash-flow projection")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("Use this data file instead of the platform default"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("init").about("Create the data file"))
        .subcommand(
            Command::new("tx")
                .about("Record and manage transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record an income or expense")
                        .arg(date_arg())
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("product")
                                .long("product")
                                .help("Inventory item id or name (sales only)"),
                        )
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .value_parser(value_parser!(u32)),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit an expense in place")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(date_arg())
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction (stock and alerts are not reverted)")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("sell")
                .about("Point-of-sale checkout at the product's current price")
                .arg(Arg::new("product").long("product").required(true))
                .arg(
                    Arg::new("quantity")
                        .long("quantity")
                        .default_value("1")
                        .value_parser(value_parser!(u32)),
                )
                .arg(date_arg()),
        )
        .subcommand(
            Command::new("inventory")
                .about("Manage inventory items")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("stock")
                                .long("stock")
                                .default_value("0")
                                .allow_negative_numbers(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .default_value("0")
                                .allow_negative_numbers(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("price").long("price").required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("alerts")
                .about("Review alerts")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("status")
                            .long("status")
                            .value_parser(["new", "ignored", "resolved"]),
                    ),
                ))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .required(true)
                                .value_parser(["new", "ignored", "resolved"]),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Analytics over the current ledger")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("trend").about("Per-product demand trend"),
                ))
                .subcommand(json_flags(
                    Command::new("projection")
                        .about("Cash-flow projection from the trailing moving average")
                        .arg(
                            Arg::new("horizon")
                                .long("horizon")
                                .default_value("90")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("window")
                                .long("window")
                                .default_value("30")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("every")
                                .long("every")
                                .default_value("7")
                                .value_parser(value_parser!(usize))
                                .help("Show every Nth projected day in the table"),
                        ),
                ))
                .subcommand(json_flags(Command::new("summary").about("Headline totals"))),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk import from CSV")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(
                            Arg::new("skip_detection")
                                .long("skip-detection")
                                .action(ArgAction::SetTrue)
                                .help("Append rows without alerts or stock changes"),
                        ),
                )
                .subcommand(
                    Command::new("inventory").arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(json_flags(
            Command::new("doctor").about("Check the ledger for integrity issues"),
        ))
        .subcommand(
            Command::new("clear")
                .about("Erase all transactions, inventory and alerts")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the wipe"),
                ),
        )
}
