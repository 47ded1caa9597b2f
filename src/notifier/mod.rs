pub mod callbacks;
pub mod commands;
pub mod conversion;
pub mod messages;
pub mod ui;

// Экспорт обработчиков для диспетчера
pub use self::callbacks::handle_callback;
pub use self::commands::handle_command;
pub use self::messages::handle_message;

use teloxide::utils::command::BotCommands;

/// Все доступные команды бота
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "open the converter panel")]
    Start,
    #[command(description = "show this message")]
    Help,
    #[command(description = "convert: /convert [amount] [FROM] [TO]")]
    Convert(String),
    #[command(description = "swap source and target currencies")]
    Swap,
    #[command(description = "list supported currencies")]
    Currencies,
}

/// Callback data кнопок
pub mod callback_data {
    pub const ENTER_AMOUNT: &str = "amount";
    pub const PICK_SOURCE: &str = "from";
    pub const PICK_TARGET: &str = "to";
    pub const SWAP: &str = "swap";
    pub const CONVERT: &str = "convert";
    pub const BACK_TO_PANEL: &str = "back";

    // Префиксы с кодом валюты: "set_from_USD"
    pub const PREFIX_SET_SOURCE: &str = "set_from_";
    pub const PREFIX_SET_TARGET: &str = "set_to_";
}

/// Разбор аргументов `/convert [amount] [FROM] [TO]`
#[derive(Debug, Default, PartialEq)]
pub struct ConvertArgs {
    pub amount: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl ConvertArgs {
    pub fn parse(args: &str) -> Self {
        let mut parts = args.split_whitespace().map(str::to_string);
        Self {
            amount: parts.next(),
            source: parts.next(),
            target: parts.next(),
        }
    }
}
