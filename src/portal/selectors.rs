//! Element selectors of the sales portal ("Relação de Vendas" screen)

// Login
pub const LOGIN_USER: &str = "#id_cod_usuario";
pub const LOGIN_PASSWORD: &str = "#nom_senha";
pub const LOGIN_SUBMIT: &str = "[name=\"login\"]";

// Side menu
pub const MENU_SEARCH: &str = "#sideMenuSearch";
pub const MENU_SEARCH_TEXT: &str = "Relação de Vendas";
pub const MENU_SALES_REPORT: &str = "[title=\"Relação de Vendas\"]";

// Report form, first tab
pub const TAB_FILTERS: &str = "#tabTabdhtmlgoodies_tabView1_0";
pub const CARD_TYPE_INPUT: &str = "#cod_cartaoEntrada";
pub const BRANCH_INPUT: &str = "#id_cod_filialEntrada";

// Report form, second tab
pub const TAB_OPTIONS: &str = "#tabTabdhtmlgoodies_tabView1_1";
pub const PAYMENT_METHOD_TOGGLE: &str = "#chk_impr_formapagto";
pub const DATE_START: &str = "#dat_inicio";
pub const DATE_END: &str = "#dat_fim";
pub const OUTPUT_PDF: &str = "#saida_1";

// Actions
pub const RUN_REPORT: &str = "#runReport";
pub const CLEAR_FORM: &str = "#limpar";
